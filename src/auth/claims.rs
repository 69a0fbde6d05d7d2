use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

/// Access-token payload issued by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    pub id: String, // user ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>, // issued at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // expires at (unix timestamp)
}

/// Reads the claims without checking the signature. The client holds no
/// signing secret; the server is the one that verifies tokens.
pub fn decode_claims(token: &str) -> ClientResult<UserClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    let data = decode::<UserClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
pub(crate) fn sign_for_tests(claims: &UserClaims) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .expect("sign test token")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: &str) -> UserClaims {
        UserClaims {
            id: id.into(),
            email: Some("an@example.com".into()),
            username: Some("an".into()),
            role: None,
            iat: Some(1_700_000_000),
            exp: Some(1_700_000_600),
        }
    }

    #[test]
    fn decodes_token_signed_with_unknown_secret() {
        let token = sign_for_tests(&claims("665f1c2e9b1d4a0012ab34cd"));
        let decoded = decode_claims(&token).expect("decode");
        assert_eq!(decoded, claims("665f1c2e9b1d4a0012ab34cd"));
    }

    #[test]
    fn expired_token_still_decodes() {
        // exp far in the past; the server decides whether it is still usable
        let mut c = claims("u1");
        c.exp = Some(1);
        let token = sign_for_tests(&c);
        assert_eq!(decode_claims(&token).expect("decode").id, "u1");
    }

    #[test]
    fn garbage_is_rejected() {
        let err = decode_claims("not-a-jwt").unwrap_err();
        assert!(err.to_string().contains("invalid access token"));
    }
}
