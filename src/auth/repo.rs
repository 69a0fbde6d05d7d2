use tracing::instrument;

use super::dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::{api::ApiClient, error::ClientResult};

#[instrument(skip(api, payload), fields(user = %payload.email_or_name))]
pub async fn login(api: &ApiClient, payload: &LoginRequest) -> ClientResult<LoginResponse> {
    api.post_public("/auth/login", payload).await
}

#[instrument(skip(api, payload), fields(email = %payload.email))]
pub async fn register(api: &ApiClient, payload: &RegisterRequest) -> ClientResult<()> {
    api.post_public_unit("/users/create", payload).await
}
