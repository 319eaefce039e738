mod auth_service;
pub mod password;
mod session_service;

pub use auth_service::{AuthService, LoginOutcome};
pub use session_service::{IssuedSession, SessionService};
