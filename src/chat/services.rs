use tracing::{info, instrument, warn};

use super::{
    dto::{ChatMessage, PromptRequest},
    repo,
};
use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
};

pub const FALLBACK_REPLY: &str = "I didn't understand that, please try again.";

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What should I eat for breakfast?",
    "How many calories should I consume daily?",
    "Can you suggest a healthy meal plan?",
    "What are good protein sources for vegetarians?",
];

const FAILURE_PREFIX: &str = "Sorry, I couldn't process your request. Please try again later.";

/// Sends `prompt` to the assistant and returns its answer.
#[instrument(skip(api, prompt))]
pub async fn ask(api: &ApiClient, prompt: &str) -> ClientResult<String> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ClientError::Validation(vec!["prompt is required".to_string()]));
    }
    let raw = repo::send(
        api,
        &PromptRequest {
            prompt: prompt.to_string(),
        },
    )
    .await?;
    Ok(reply_text(&raw))
}

/// A JSON string body is unwrapped, anything else is shown as sent. A blank
/// answer becomes [`FALLBACK_REPLY`].
fn reply_text(raw: &str) -> String {
    let text = serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string());
    if text.trim().is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        text
    }
}

/// Messages exchanged in one chat, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Records the prompt and the assistant's answer. A failed request is
    /// recorded as a `failed` assistant message carrying the server's
    /// message; only an empty prompt returns an error, and leaves the
    /// conversation untouched.
    pub async fn send(&mut self, api: &ApiClient, prompt: &str) -> ClientResult<&ChatMessage> {
        if prompt.trim().is_empty() {
            return Err(ClientError::Validation(vec!["prompt is required".to_string()]));
        }
        self.messages.push(ChatMessage::user(prompt.trim()));

        let reply = match ask(api, prompt).await {
            Ok(text) => {
                info!(turns = self.messages.len(), "assistant replied");
                ChatMessage::assistant(text)
            }
            Err(e) => {
                warn!(error = %e, "assistant request failed");
                ChatMessage {
                    failed: true,
                    ..ChatMessage::assistant(format!("{FAILURE_PREFIX}\n\n{}", e.user_message()))
                }
            }
        };
        self.messages.push(reply);
        Ok(&self.messages[self.messages.len() - 1])
    }
}
