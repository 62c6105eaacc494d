// Authentication module
// Decision: one active strategy per deployment, selected by AUTH_MODE
// Decision: stateless bearer tokens, verified on every request

pub mod authenticator;
pub mod config;
pub mod guard;
pub mod routes;
pub mod tokens;

pub use config::{AuthConfig, AuthMode};
pub use guard::{AuthError, AuthUser, FromRef};
pub use routes::{routes, AuthState};
pub use tokens::TokenService;
