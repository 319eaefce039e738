//! Registration, login and session handling.
//!
//! Sessions are HS256-signed tokens carried either as a Bearer token or in
//! an HttpOnly cookie; see [`services::SessionService`].

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::{AuthService, SessionService};
