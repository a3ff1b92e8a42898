use crate::state::AppState;
use axum::Router;

pub mod credentials;
pub mod dto;
pub mod handlers;
pub mod store;
pub mod token;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use dto::{AuthState, LoginResult, SessionUser};
pub use store::{AuthStore, MemoryStorage, SessionStorage};
pub use token::SessionKeys;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
