//! Policy store: the role-based evaluator the authorizer asks for allow/deny.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind};

/// Abstract action of the permission lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow/deny evaluator keyed by (subject, canonical object, canonical action).
///
/// Implementations must be safe to call concurrently and must not change state on
/// `enforce`. A store that cannot answer (backend down, etc.) returns an `Internal` error
/// rather than `false`.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn enforce(&self, subject: &str, object: &str, action: Action) -> Result<bool, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub object: String,
    pub action: Action,
}

/// Roles and who holds them.
///
/// ```json
/// {
///   "roles": { "user": [{ "object": "/api/v1/movies", "action": "read" }] },
///   "assignments": { "alice@example.com": ["user"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<Permission>>,
    #[serde(default)]
    pub assignments: BTreeMap<String, Vec<String>>,
}

impl PolicySet {
    #[must_use]
    pub fn grant(mut self, role: &str, object: &str, action: Action) -> Self {
        self.roles.entry(role.to_owned()).or_default().push(Permission {
            object: object.to_owned(),
            action,
        });
        self
    }

    #[must_use]
    pub fn assign(mut self, subject: &str, role: &str) -> Self {
        self.assignments
            .entry(subject.to_owned())
            .or_default()
            .push(role.to_owned());
        self
    }

    pub fn allows(&self, subject: &str, object: &str, action: Action) -> bool {
        let Some(roles) = self.assignments.get(subject) else {
            return false;
        };

        roles
            .iter()
            .filter_map(|role| self.roles.get(role))
            .flatten()
            .any(|p| p.object == object && p.action == action)
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw)
            .map_err(|e| Error::wrap_with(Kind::Invalid, "invalid policy document", e))
    }
}

/// In-memory RBAC store whose policy set can be swapped while requests are in flight.
///
/// Each `enforce` reads a single snapshot, so it sees either the old or the new set in
/// full.
#[derive(Debug)]
pub struct RbacPolicyStore {
    policy: ArcSwap<PolicySet>,
}

impl RbacPolicyStore {
    pub fn new(policy: PolicySet) -> Self {
        Self {
            policy: ArcSwap::from_pointee(policy),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(read_policy_file(path.as_ref())?))
    }

    pub fn reload(&self, policy: PolicySet) {
        self.policy.store(Arc::new(policy));
        tracing::info!("policy set reloaded");
    }

    /// Re-read `path` and swap it in. The current set stays active on failure.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let policy = read_policy_file(path.as_ref())?;
        self.reload(policy);
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<PolicySet> {
        self.policy.load_full()
    }
}

#[async_trait]
impl PolicyStore for RbacPolicyStore {
    async fn enforce(&self, subject: &str, object: &str, action: Action) -> Result<bool, Error> {
        Ok(self.policy.load().allows(subject, object, action))
    }
}

fn read_policy_file(path: &Path) -> Result<PolicySet, Error> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::wrap_with(Kind::Internal, "could not read policy file", e)
            .with_param("path", path.display())
    })?;

    PolicySet::from_json(&raw).map_err(|e| e.with_param("path", path.display()))
}
