//! Caller identity from the hosted auth provider's access tokens

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use moderation::Caller;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Verifies HS256 tokens signed with the provider's shared secret
pub struct AuthVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// None for any invalid, expired or foreign token
    pub fn verify(&self, token: &str) -> Option<Caller> {
        let data = match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                debug!("Rejected access token: {}", e);
                return None;
            }
        };

        match data.claims.sub.parse::<Uuid>() {
            Ok(user_id) => Some(Caller::new(user_id)),
            Err(_) => {
                debug!("Access token subject is not a UUID");
                None
            }
        }
    }
}

/// The acting identity, None for guests
pub struct MaybeCaller(pub Option<Caller>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeCaller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| state.auth.verify(token.trim()));

        Ok(MaybeCaller(caller))
    }
}
