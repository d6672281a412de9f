//! Authorization decision point: may subject S perform verb V on resource path P?
//!
//! Paths are collapsed onto a fixed, ordered list of resource prefixes and verbs onto
//! read/write before the policy store is asked, so policies stay collection-level
//! ("user may read /api/v1/movies") while callers pass concrete paths.

use std::sync::Arc;

use axum::http::Method;

use super::identity::Subject;
use super::policy::{Action, PolicyStore};
use crate::error::Error;

pub const MOVIES_PATH: &str = "/api/v1/movies";
pub const LOGGER_PATH: &str = "/api/v1/logger";

/// Known resources, first match wins.
const RESOURCES: &[&str] = &[MOVIES_PATH, LOGGER_PATH];

/// Canonical object for `path`: the first known prefix it falls under.
///
/// A prefix matches the path itself or anything below it (`/api/v1/movies/42`), not a
/// longer sibling (`/api/v1/moviesX`).
pub fn canonical_object(path: &str) -> Option<&'static str> {
    RESOURCES.iter().copied().find(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// `GET` reads; every other verb writes.
pub fn canonical_action(verb: &Method) -> Action {
    if *verb == Method::GET {
        Action::Read
    } else {
        Action::Write
    }
}

#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn PolicyStore>,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer").finish_non_exhaustive()
    }
}

impl Authorizer {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Succeeds silently when allowed.
    ///
    /// # Errors
    /// - `Unauthorized` for an unknown resource, an empty subject or a policy deny
    /// - the policy store's own error (typically `Internal`) when it cannot answer
    pub async fn authorize(
        &self,
        subject: &Subject,
        object_path: &str,
        verb: &Method,
    ) -> Result<(), Error> {
        let sub = subject.id();
        let act = canonical_action(verb);

        let Some(obj) = canonical_object(object_path) else {
            tracing::info!(sub, obj = object_path, act = %act, decision = "deny", "unknown resource");
            return Err(denied(sub, object_path, act).with_param("reason", "unknown_resource"));
        };

        if sub.trim().is_empty() {
            tracing::info!(sub, obj, act = %act, decision = "deny", "empty subject");
            return Err(denied(sub, obj, act).with_param("reason", "empty_subject"));
        }

        if self.store.enforce(sub, obj, act).await? {
            tracing::debug!(sub, obj, act = %act, decision = "allow", "authorized");
            return Ok(());
        }

        // Authentication already succeeded by the time we get here: this is a 403, not a 401.
        tracing::info!(sub, obj, act = %act, decision = "deny", "unauthorized");
        Err(denied(sub, obj, act))
    }
}

fn denied(sub: &str, obj: &str, act: Action) -> Error {
    Error::unauthorized(format!("user {sub} does not have {act} permission for {obj}"))
        .with_param("sub", sub)
        .with_param("obj", obj)
        .with_param("act", act)
}
