//! Application state

use common::Config;
use moderation::ModerationService;

use crate::auth::AuthVerifier;

/// Shared application state
pub struct AppState {
    pub moderation: ModerationService,
    pub auth: AuthVerifier,
}

impl AppState {
    pub fn new(config: &Config, moderation: ModerationService) -> Self {
        Self {
            moderation,
            auth: AuthVerifier::new(&config.auth_jwt_secret, &config.auth_jwt_audience),
        }
    }
}
