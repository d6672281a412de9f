//! Factory: build the authentication and authorization services from application `Config`.
use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::Config;
use crate::error::Error;
use crate::services::auth::{Authenticator, Authorizer, JwtAuthenticator, RbacPolicyStore};

pub fn build_authenticator(config: &Config) -> Arc<dyn Authenticator> {
    Arc::new(JwtAuthenticator::new(
        config.auth_jwt_secret.expose_secret().as_bytes(),
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    ))
}

/// Load the policy file named by `POLICY_FILE`.
///
/// The store is returned on its own so the caller can keep a handle for reloads.
pub fn build_policy_store(config: &Config) -> Result<Arc<RbacPolicyStore>, Error> {
    let store = RbacPolicyStore::from_file(&config.policy_file)?;

    let snapshot = store.snapshot();
    tracing::info!(
        path = %config.policy_file.display(),
        roles = snapshot.roles.len(),
        subjects = snapshot.assignments.len(),
        "policy set loaded"
    );

    Ok(Arc::new(store))
}

pub fn build_authorizer(store: Arc<RbacPolicyStore>) -> Authorizer {
    Authorizer::new(store)
}
