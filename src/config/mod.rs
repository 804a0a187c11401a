//! Client configuration and the persisted session.

mod credentials;
mod loader;
mod session;
mod types;

pub use credentials::AuthToken;
pub use loader::{app_dir, ConfigError, API_URL_ENV};
pub use session::{SessionError, SessionStore};
pub use types::{ApiConfig, Config, SessionConfig};
