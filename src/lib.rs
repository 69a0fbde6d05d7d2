//! Client core of a diet-tracking app: nutrition totals, water reminder
//! schedules, and an authenticated REST client that refreshes its session.

pub mod api;
pub mod auth;
pub mod body;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod dates;
pub mod error;
pub mod meals;
pub mod nutrition;
pub mod state;
pub mod water;

#[cfg(test)]
mod testing;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use state::AppState;
