pub mod auth_handler;

pub use auth_handler::{
    __path_get_session, __path_login, __path_logout, __path_register, get_session, login, logout,
    register,
};
