pub mod access_jwt;
pub mod authorizer;
pub mod context;
pub mod factory;
pub mod identity;
pub mod policy;

pub use access_jwt::{Authenticator, JwtAuthenticator};
pub use authorizer::Authorizer;
pub use context::RequestContext;
pub use factory::{build_authenticator, build_authorizer, build_policy_store};
pub use identity::{AccessToken, Realm};
pub use policy::RbacPolicyStore;
