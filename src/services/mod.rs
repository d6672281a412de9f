pub mod auth;
pub mod logger;
