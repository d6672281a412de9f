/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, DATABASE_URL, CORS 許可、Auth/Policy/Log 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::services::auth::Realm;

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";
const DEFAULT_POLICY_FILE: &str = "config/policy.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    /// Postgres connection string; carries the password.
    pub database_url: SecretString,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// `None` means the default realm.
    pub auth_realm: Option<Realm>,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub auth_jwt_secret: SecretString,
    pub access_token_leeway_seconds: u64,

    pub policy_file: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (the process env in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| non_empty(key).ok_or(ConfigError::Missing(key));

        let port: u16 = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = SecretString::from(required("DATABASE_URL")?);

        let app_env = AppEnv::parse(non_empty("APP_ENV").as_deref());

        let cors_allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_realm = non_empty("AUTH_REALM").map(|r| Realm::new(r.trim()));
        let auth_issuer = required("AUTH_ISSUER")?;
        let auth_audience = required("AUTH_AUDIENCE")?;
        let auth_jwt_secret = SecretString::from(required("AUTH_JWT_SECRET")?);

        let access_token_leeway_seconds = match non_empty("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 60,
        };

        let policy_file = PathBuf::from(
            non_empty("POLICY_FILE").unwrap_or_else(|| DEFAULT_POLICY_FILE.to_string()),
        );

        // RUST_LOG wins so the usual `RUST_LOG=debug cargo run` keeps working.
        let log_filter = non_empty("RUST_LOG")
            .or_else(|| non_empty("LOG_FILTER"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth_realm,
            auth_issuer,
            auth_audience,
            auth_jwt_secret,
            access_token_leeway_seconds,
            policy_file,
            log_filter,
        })
    }
}
