//! Authenticated session lifecycle and token persistence.

pub mod session;
pub mod token_store;

pub use session::{AuthSession, SessionError, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
