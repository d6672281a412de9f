/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - movies repo (postgres), authenticator, authorizer, log filter handle, realm
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::movie_repo::MovieRepo;
use crate::services::auth::{Authenticator, Authorizer, Realm};
use crate::services::logger::LogControl;

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieRepo>,
    pub authenticator: Arc<dyn Authenticator>,
    pub authorizer: Authorizer,
    pub log_control: LogControl,
    /// Realm attached to each request context; `None` leaves the default.
    pub realm: Option<Realm>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("authorizer", &self.authorizer)
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        movies: Arc<dyn MovieRepo>,
        authenticator: Arc<dyn Authenticator>,
        authorizer: Authorizer,
        log_control: LogControl,
        realm: Option<Realm>,
    ) -> Self {
        Self {
            movies,
            authenticator,
            authorizer,
            log_control,
            realm,
        }
    }
}
