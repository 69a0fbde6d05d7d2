pub mod claims;
pub mod dto;
pub mod repo;
pub mod services;
pub mod session;

pub use claims::{decode_claims, UserClaims};
pub use services::{login, logout, register};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
