/*
 * Responsibility
 * - PgPool の生成 (DATABASE_URL) と migrations の適用
 */
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::repos::error::RepoError;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect(database_url: &SecretString) -> Result<PgPool, RepoError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!(max_connections = MAX_CONNECTIONS, "database ready");

    Ok(pool)
}
