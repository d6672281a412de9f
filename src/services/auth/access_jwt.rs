use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

use crate::error::{Error, Kind};
use crate::services::auth::identity::{AccessToken, Subject};

/// Resolves an access token to the subject it was issued for.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &AccessToken) -> Result<Subject, Error>;
}

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    MissingOrInvalidAud,
    EmptyClaim(&'static str),
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::MissingOrInvalidAud => write!(f, "missing or invalid 'aud' claim"),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

impl From<AccessJwtError> for Error {
    fn from(e: AccessJwtError) -> Self {
        Error::wrap_with(Kind::Unauthenticated, "invalid access token", e)
    }
}

fn aud_is_present_and_valid(aud: &serde_json::Value) -> bool {
    match aud {
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(arr) => arr.iter().any(|v| match v {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        // Missing claim ends up as Null due to #[serde(default)]
        _ => false,
    }
}

/// Access token (JWT) claims.
///
/// `sub` is the subject's email, the identifier policies are written against.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    // Keep as Value to accept both string and array. Validation handles audience checks.
    #[serde(default)]
    pub aud: serde_json::Value,

    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtAuthenticator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8], issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    // Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature
    /// - `exp` (unless disabled)
    /// - `iss` and `aud` (because we set them)
    ///
    /// This method additionally checks:
    /// - required claims are present *and not empty* (`iss`, `aud`, `sub`, `exp`)
    pub fn verify_strict(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let claims = self.verify(token)?;

        if claims.iss.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(AccessJwtError::EmptyClaim("exp"));
        }
        if !aud_is_present_and_valid(&claims.aud) {
            return Err(AccessJwtError::MissingOrInvalidAud);
        }

        Ok(claims)
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, token: &AccessToken) -> Result<Subject, Error> {
        let claims = self
            .verify_strict(token.token())
            .map_err(|e| Error::from(e).with_param("token_type", token.token_type()))?;

        Ok(Subject {
            email: claims.sub,
            name: claims.name,
            roles: claims.roles.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::services::auth::identity::BEARER_TOKEN_TYPE;

    pub(crate) const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";
    pub(crate) const ISSUER: &str = "https://auth.example.com";
    pub(crate) const AUDIENCE: &str = "movie-api";

    pub(crate) fn now() -> u64 {
        chrono::Utc::now().timestamp().unsigned_abs()
    }

    pub(crate) fn mint(claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    pub(crate) fn mint_for(sub: &str) -> String {
        mint(&json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "sub": sub,
            "exp": now() + 600,
            "name": "Test User",
            "roles": ["user"],
        }))
    }

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new(SECRET, ISSUER, AUDIENCE, 0)
    }

    fn bearer(token: String) -> AccessToken {
        AccessToken::new(token, BEARER_TOKEN_TYPE)
    }

    #[tokio::test]
    async fn valid_token_resolves_subject() {
        let subject = authenticator()
            .authenticate(&bearer(mint_for("alice@example.com")))
            .await
            .unwrap();

        assert_eq!(subject.email, "alice@example.com");
        assert_eq!(subject.name.as_deref(), Some("Test User"));
        assert_eq!(subject.roles, vec!["user".to_owned()]);
    }

    #[tokio::test]
    async fn wrong_audience_is_unauthenticated() {
        let token = mint(&json!({
            "iss": ISSUER,
            "aud": "someone-else",
            "sub": "alice@example.com",
            "exp": now() + 600,
        }));

        let err = authenticator().authenticate(&bearer(token)).await.unwrap_err();
        assert_eq!(err.kind(), Kind::Unauthenticated);
        assert_eq!(err.message(), "invalid access token");
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let token = mint(&json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "sub": "alice@example.com",
            "exp": now() - 3600,
        }));

        let err = authenticator().authenticate(&bearer(token)).await.unwrap_err();
        assert_eq!(err.kind(), Kind::Unauthenticated);
    }

    #[tokio::test]
    async fn empty_sub_is_rejected() {
        let token = mint(&json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "sub": "  ",
            "exp": now() + 600,
        }));

        let err = authenticator().authenticate(&bearer(token)).await.unwrap_err();
        assert_eq!(err.kind(), Kind::Unauthenticated);
        assert!(err.cause_text().unwrap().contains("'sub'"));
    }

    #[tokio::test]
    async fn garbage_is_unauthenticated_and_never_echoed() {
        let err = authenticator()
            .authenticate(&bearer("not-a-jwt".to_owned()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::Unauthenticated);
        assert!(!err.to_string().contains("not-a-jwt"));
    }

    #[test]
    fn debug_hides_key_material() {
        let dbg = format!("{:?}", authenticator());
        assert!(dbg.contains("JwtAuthenticator"));
        assert!(!dbg.contains("test-secret"));
    }
}
