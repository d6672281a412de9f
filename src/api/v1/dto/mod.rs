pub mod logger;
pub mod movies;
