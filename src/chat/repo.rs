use tracing::instrument;

use super::dto::PromptRequest;
use crate::{api::ApiClient, error::ClientResult};

/// Raw reply body. The assistant answers with plain text.
#[instrument(skip(api, request), fields(chars = request.prompt.chars().count()))]
pub async fn send(api: &ApiClient, request: &PromptRequest) -> ClientResult<String> {
    api.post_public_text("/smartdiet/ai/chats", request).await
}
