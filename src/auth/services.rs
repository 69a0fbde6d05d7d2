use lazy_static::lazy_static;
use regex::Regex;
use time::Date;
use tracing::{info, instrument, warn};

use super::{
    claims::UserClaims,
    dto::{LoginRequest, RegisterForm, RegisterRequest},
    repo,
};
use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
};

const LOGIN_MIN_PASSWORD: usize = 6;
const REGISTER_MIN_PASSWORD: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Rules a new password breaks; empty when it is acceptable.
pub fn password_issues(password: &str) -> Vec<&'static str> {
    lazy_static! {
        static ref SPECIAL_RE: Regex = Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap();
    }
    let mut issues = Vec::new();
    if password.chars().count() < REGISTER_MIN_PASSWORD {
        issues.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push("at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        issues.push("at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push("at least one digit");
    }
    if !SPECIAL_RE.is_match(password) {
        issues.push("at least one special character");
    }
    issues
}

pub fn validate_login(identifier: &str, password: &str) -> ClientResult<LoginRequest> {
    let identifier = identifier.trim();
    let mut errors = Vec::new();

    if identifier.is_empty() {
        errors.push("email is required".to_string());
    } else if identifier.contains('@') && !is_valid_email(identifier) {
        errors.push("email is invalid".to_string());
    }

    if password.trim().is_empty() {
        errors.push("password is required".to_string());
    } else if password.chars().count() < LOGIN_MIN_PASSWORD {
        errors.push("password must be at least 6 characters".to_string());
    }

    if !errors.is_empty() {
        return Err(ClientError::Validation(errors));
    }
    Ok(LoginRequest {
        email_or_name: identifier.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_registration(form: &RegisterForm, today: Date) -> ClientResult<RegisterRequest> {
    let mut errors = Vec::new();
    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty() {
        errors.push("username is required".to_string());
    }

    if email.is_empty() {
        errors.push("email is required".to_string());
    } else if !is_valid_email(email) {
        errors.push("email is invalid".to_string());
    }

    if form.password.trim().is_empty() {
        errors.push("password is required".to_string());
    } else {
        let issues = password_issues(&form.password);
        if !issues.is_empty() {
            errors.push(format!("password needs {}", issues.join(", ")));
        }
    }

    if form.confirm_password.trim().is_empty() {
        errors.push("please confirm the password".to_string());
    } else if form.password != form.confirm_password {
        errors.push("passwords do not match".to_string());
    }

    match form.dob {
        None => errors.push("date of birth is required".to_string()),
        Some(dob) if dob > today => errors.push("date of birth cannot be in the future".to_string()),
        Some(_) => {}
    }

    match (errors.is_empty(), form.dob) {
        (true, Some(dob)) => Ok(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: form.password.clone(),
            dob,
        }),
        _ => Err(ClientError::Validation(errors)),
    }
}

/// Logs in and stores the returned access token in the session.
#[instrument(skip(api, password))]
pub async fn login(api: &ApiClient, identifier: &str, password: &str) -> ClientResult<Option<UserClaims>> {
    let payload = validate_login(identifier, password)?;
    let response = repo::login(api, &payload).await?;
    let token = match response.access_token {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!("login response without access token");
            return Err(ClientError::MissingToken);
        }
    };
    api.session().set_token(&token).await?;
    let user = api.session().user().await;
    info!(user_id = ?user.as_ref().map(|u| u.id.as_str()), "user logged in");
    Ok(user)
}

#[instrument(skip(api, form), fields(email = %form.email))]
pub async fn register(api: &ApiClient, form: &RegisterForm, today: Date) -> ClientResult<()> {
    let payload = validate_registration(form, today)?;
    repo::register(api, &payload).await?;
    info!(email = %payload.email, "user registered");
    Ok(())
}

pub async fn logout(api: &ApiClient) {
    api.session().clear().await;
    info!("user logged out");
}
