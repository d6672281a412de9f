/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - unique 制約違反 (23505) は Conflict、それ以外の DB エラーは Db
 */
use chrono::NaiveDate;
use thiserror::Error;

use crate::error::{Error as AppError, Kind};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("migration failed")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("movie {title:?} released {released} already exists")]
    Conflict { title: String, released: NaiveDate },
}

impl RepoError {
    /// `title`/`released` name the row that collided with the unique key.
    pub fn from_sqlx(e: sqlx::Error, title: &str, released: NaiveDate) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some(UNIQUE_VIOLATION)
        {
            return RepoError::Conflict {
                title: title.to_owned(),
                released,
            };
        }
        RepoError::Db(e)
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) | RepoError::Migrate(_) => AppError::wrap(Kind::Database, e),
            RepoError::Conflict { .. } => AppError::wrap_with(Kind::Exist, e.to_string(), e),
        }
    }
}
