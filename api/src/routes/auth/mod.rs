//! Authentication route handlers
//!
//! - `me` - claims of the presented token
//! - `logout` - revoke the presented token

pub mod logout;
pub mod me;

use std::sync::Arc;
use std::time::Duration;
use tw_core::services::Authenticator;

/// Shared state for the authentication routes
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<dyn Authenticator>,
    /// Deadline applied to every revocation store call made for a request
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(authenticator: Arc<dyn Authenticator>, store_timeout: Duration) -> Self {
        Self {
            authenticator,
            store_timeout,
        }
    }
}
