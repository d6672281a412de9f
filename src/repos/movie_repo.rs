/*
 * Responsibility
 * - movies テーブル向け SQLx 操作 (MovieRepo trait の postgres 実装)
 * - external id (UUID) を主キーとして扱う
 * - title + released の unique 制約違反は RepoError::Conflict
 */
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MovieRow {
    pub id: Uuid,
    pub title: String,
    pub rated: String,
    pub released: NaiveDate,
    pub run_time: i32,
    pub director: String,
    pub writer: String,
    pub create_user: String,
    pub created_at: DateTime<Utc>,
    pub update_user: String,
    pub updated_at: DateTime<Utc>,
}

/// Writable movie fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFields {
    pub title: String,
    pub rated: String,
    pub released: NaiveDate,
    pub run_time: i32,
    pub director: String,
    pub writer: String,
}

/// Movie storage. `username` is the subject recorded as creator/updater.
#[async_trait]
pub trait MovieRepo: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), RepoError>;

    /// Ordered by release date, then title.
    async fn list(&self) -> Result<Vec<MovieRow>, RepoError>;

    async fn create(&self, fields: MovieFields, username: &str) -> Result<MovieRow, RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<MovieRow>, RepoError>;

    /// `Ok(None)` when there is no movie with `id`.
    async fn update(
        &self,
        id: Uuid,
        fields: MovieFields,
        username: &str,
    ) -> Result<Option<MovieRow>, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<Option<MovieRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgMovieRepo {
    pool: PgPool,
}

impl PgMovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepo for PgMovieRepo {
    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MovieRow>, RepoError> {
        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, rated, released, run_time, director, writer,
                   create_user, created_at, update_user, updated_at
            FROM movies
            ORDER BY released, title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, fields: MovieFields, username: &str) -> Result<MovieRow, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (id, title, rated, released, run_time, director, writer,
                                create_user, update_user)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, title, rated, released, run_time, director, writer,
                      create_user, created_at, update_user, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(&fields.rated)
        .bind(fields.released)
        .bind(fields.run_time)
        .bind(&fields.director)
        .bind(&fields.writer)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::from_sqlx(e, &fields.title, fields.released))?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<MovieRow>, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, rated, released, run_time, director, writer,
                   create_user, created_at, update_user, updated_at
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: MovieFields,
        username: &str,
    ) -> Result<Option<MovieRow>, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            UPDATE movies
            SET title = $2, rated = $3, released = $4, run_time = $5,
                director = $6, writer = $7, update_user = $8, updated_at = now()
            WHERE id = $1
            RETURNING id, title, rated, released, run_time, director, writer,
                      create_user, created_at, update_user, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.rated)
        .bind(fields.released)
        .bind(fields.run_time)
        .bind(&fields.director)
        .bind(&fields.writer)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::from_sqlx(e, &fields.title, fields.released))?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<MovieRow>, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            DELETE FROM movies
            WHERE id = $1
            RETURNING id, title, rated, released, run_time, director, writer,
                      create_user, created_at, update_user, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
