pub mod auth;
pub mod dao;
pub mod workflows;

pub use auth::AuthService;
pub use dao::*;
