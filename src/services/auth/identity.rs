//! Identity values carried through a request: access token, realm and subject.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::context::RequestContext;
use crate::error::Error;

/// Realm used in challenges when none was set for the request.
pub const DEFAULT_REALM: &str = "movie-api";

/// Token type of `Authorization: Bearer ...` credentials.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Bearer credential taken from a request.
///
/// The token is kept as a [`SecretString`]; `Debug` never prints it.
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
    token_type: String,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            token_type: token_type.into(),
        }
    }

    /// Parse an `Authorization` header value using the bearer scheme.
    ///
    /// `None` for any other scheme. `Bearer` with no credential parses to an empty token,
    /// which [`RequestContext::access_token`] later refuses.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let (scheme, rest) = value.split_once(' ').unwrap_or((value, ""));
        scheme
            .eq_ignore_ascii_case(BEARER_TOKEN_TYPE)
            .then(|| Self::new(rest.trim(), BEARER_TOKEN_TYPE))
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn is_empty(&self) -> bool {
        self.token().is_empty()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token() && self.token_type == other.token_type
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Protection domain named in `WWW-Authenticate` challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realm(String);

impl Realm {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new(DEFAULT_REALM)
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated principal.
///
/// `email` is the identifier the policy store knows the subject by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
}

impl Subject {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            roles: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.email
    }
}

impl RequestContext {
    #[must_use]
    pub fn with_access_token(&self, token: AccessToken) -> Self {
        self.attach(token)
    }

    /// The request's access token.
    ///
    /// # Errors
    /// `Unauthenticated` when no token was attached, and also when the attached token is
    /// empty.
    pub fn access_token(&self) -> Result<&AccessToken, Error> {
        let token = self.retrieve::<AccessToken>().ok_or_else(|| {
            Error::unauthenticated("access token required").with_param("reason", "missing")
        })?;

        if token.is_empty() {
            return Err(Error::unauthenticated("access token is empty")
                .with_param("reason", "empty")
                .with_param("token_type", token.token_type()));
        }
        Ok(token)
    }

    #[must_use]
    pub fn with_realm(&self, realm: Realm) -> Self {
        self.attach(realm)
    }

    /// The request's realm, or the default realm when none was set.
    pub fn realm(&self) -> Realm {
        self.retrieve::<Realm>().cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn with_subject(&self, subject: Subject) -> Self {
        self.attach(subject)
    }

    /// # Errors
    /// `Unauthenticated` when no subject was resolved for the request.
    pub fn subject(&self) -> Result<&Subject, Error> {
        self.retrieve::<Subject>()
            .ok_or_else(|| Error::unauthenticated("no authenticated subject"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    fn token() -> AccessToken {
        AccessToken::new("abcdef123", BEARER_TOKEN_TYPE)
    }

    #[test]
    fn access_token_round_trips_through_context() {
        let ctx = RequestContext::new().with_access_token(token());
        assert_eq!(ctx.access_token().unwrap(), &token());
    }

    #[test]
    fn missing_access_token_is_unauthenticated() {
        let err = RequestContext::new().access_token().unwrap_err();

        assert_eq!(err.kind(), Kind::Unauthenticated);
        assert_eq!(err.params_text(), "reason=missing");
    }

    #[test]
    fn empty_access_token_is_unauthenticated_not_success() {
        let ctx = RequestContext::new().with_access_token(AccessToken::new("", BEARER_TOKEN_TYPE));
        let err = ctx.access_token().unwrap_err();

        assert_eq!(err.kind(), Kind::Unauthenticated);
        assert!(err.params_text().contains("reason=empty"));
    }

    #[test]
    fn realm_defaults_when_unset() {
        assert_eq!(RequestContext::new().realm(), Realm::default());
        assert_eq!(RequestContext::new().realm().as_str(), DEFAULT_REALM);
    }

    #[test]
    fn realm_set_on_context_is_returned() {
        let ctx = RequestContext::new().with_realm(Realm::new("backoffice"));
        assert_eq!(ctx.realm().as_str(), "backoffice");
    }

    #[test]
    fn subject_must_be_resolved() {
        assert!(RequestContext::new().subject().unwrap_err().is(Kind::Unauthenticated));

        let ctx = RequestContext::new().with_subject(Subject::new("alice@example.com"));
        assert_eq!(ctx.subject().unwrap().id(), "alice@example.com");
    }

    #[test]
    fn parses_bearer_header() {
        let at = AccessToken::from_authorization_header("Bearer abcdef123").unwrap();
        assert_eq!(at, token());

        let lower = AccessToken::from_authorization_header("bearer abcdef123").unwrap();
        assert_eq!(lower.token(), "abcdef123");
        assert_eq!(lower.token_type(), BEARER_TOKEN_TYPE);
    }

    #[test]
    fn bearer_without_credential_is_an_empty_token() {
        let at = AccessToken::from_authorization_header("Bearer").unwrap();
        assert!(at.is_empty());

        let spaced = AccessToken::from_authorization_header("Bearer    ").unwrap();
        assert!(spaced.is_empty());
    }

    #[test]
    fn other_schemes_are_not_access_tokens() {
        assert!(AccessToken::from_authorization_header("Basic dXNlcjpwYXNz").is_none());
        assert!(AccessToken::from_authorization_header("").is_none());
    }

    #[test]
    fn token_equality_is_by_value() {
        assert_eq!(token(), AccessToken::new("abcdef123", BEARER_TOKEN_TYPE));
        assert_ne!(token(), AccessToken::new("abcdef124", BEARER_TOKEN_TYPE));
    }

    #[test]
    fn debug_redacts_the_token() {
        let dbg = format!("{:?}", token());
        assert!(!dbg.contains("abcdef123"));
        assert!(dbg.contains("REDACTED"));
    }
}
