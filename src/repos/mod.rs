pub mod db;
pub mod error;
#[cfg(test)]
pub mod memory_movie_repo;
pub mod movie_repo;
