/*
 * Responsibility
 * - The one error type every layer reports failures with
 * - A closed set of kinds; callers branch on kind, never on message text
 * - Wrapping keeps the lower-level cause (for the operator log) behind the outer kind
 */
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

mod response;

pub use response::respond;

/// Boxed lower-level cause kept behind an [`Error`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Bad input from the client.
    Invalid,
    /// Credentials were required but missing or not acceptable.
    Unauthenticated,
    /// Authenticated, but not permitted to do this.
    Unauthorized,
    NotFound,
    /// Conflict with something that already exists.
    Exist,
    Database,
    /// Unexpected system fault.
    Internal,
    /// Nothing along the way classified the failure.
    Unanticipated,
}

impl Kind {
    /// Stable wire name, used in the JSON error body.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Exist => "exist",
            Self::Database => "database",
            Self::Internal => "internal",
            Self::Unanticipated => "unanticipated",
        }
    }

    /// Message used when an error is built from a cause with no message of its own.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Invalid => "invalid request",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "forbidden",
            Self::NotFound => "not found",
            Self::Exist => "already exists",
            Self::Database => "database error",
            Self::Internal => "internal server error",
            Self::Unanticipated => "unexpected error",
        }
    }

    /// Server-side faults: their detail stays in the log.
    pub const fn is_server_fault(self) -> bool {
        matches!(self, Self::Database | Self::Internal | Self::Unanticipated)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure.
///
/// `Display` shows only the top-level message. The wrapped cause is reachable through
/// [`StdError::source`] / [`Error::chain`] and is meant for logs, not for clients.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Error {
    kind: Kind,
    message: String,
    params: Vec<(String, String)>,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            params: Vec::new(),
            source: None,
        }
    }

    /// Classify `cause` as `kind`.
    ///
    /// When both the new kind and a wrapped [`Error`]'s kind are client-facing, the inner
    /// message is kept. Otherwise the message is the kind's default, so server-side detail
    /// never ends up in the message.
    pub fn wrap(kind: Kind, cause: impl Into<BoxError>) -> Self {
        let cause: BoxError = cause.into();
        let message = match cause.downcast_ref::<Error>() {
            Some(inner) if !kind.is_server_fault() && !inner.kind.is_server_fault() => {
                inner.message.clone()
            }
            _ => kind.default_message().to_owned(),
        };

        Self {
            kind,
            message,
            params: Vec::new(),
            source: Some(cause),
        }
    }

    pub fn wrap_with(kind: Kind, message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            kind,
            message: message.into(),
            params: Vec::new(),
            source: Some(cause.into()),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(Kind::Invalid, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(Kind::Unauthenticated, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(Kind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Kind::NotFound, message)
    }

    pub fn exist(message: impl Into<String>) -> Self {
        Self::new(Kind::Exist, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Kind::Internal, message)
    }

    /// Attach a diagnostic key/value. Logged, never rendered.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// This error followed by every wrapped cause, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        std::iter::successors(Some(self as &(dyn StdError + 'static)), |&e| e.source())
    }

    /// Wrapped causes rendered as `a: b: c`, for the operator log.
    pub fn cause_text(&self) -> Option<String> {
        let causes: Vec<String> = self.chain().skip(1).map(ToString::to_string).collect();
        (!causes.is_empty()).then(|| causes.join(": "))
    }

    /// Params rendered as `k=v k=v`, for the operator log.
    pub fn params_text(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Kind of an arbitrary error: its own kind if it is an [`Error`], else `Unanticipated`.
pub fn kind_of(err: &(dyn StdError + 'static)) -> Kind {
    err.downcast_ref::<Error>()
        .map_or(Kind::Unanticipated, Error::kind)
}
