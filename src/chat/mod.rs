//! Nutrition assistant chat.

pub mod dto;
pub mod repo;
mod services;

pub use dto::{ChatMessage, ChatRole, PromptRequest};
pub use services::{ask, Conversation, FALLBACK_REPLY, SUGGESTED_QUESTIONS};
