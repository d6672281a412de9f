pub mod fallback;
pub mod health;
pub mod logger;
pub mod movies;
