mod user;

pub use user::{normalize_email, NewUser, User};
