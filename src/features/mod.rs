pub mod auth;
pub mod dashboard;
pub mod files;
pub mod users;
