// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and shared request helpers

pub mod admin;
pub mod engagement;
pub mod gyms;
pub mod health;
pub mod reviews;

pub use admin::config as admin_config;
pub use engagement::config as engagement_config;
pub use gyms::config as gyms_config;
pub use health::config as health_config;
pub use reviews::config as reviews_config;

use crate::errors::GymsError;
use actix_web::HttpRequest;
use uuid::Uuid;

/// Extract the authenticated user id from the X-User-Id header
/// DOCUMENTATION: The auth provider in front of this service resolves the
/// session and forwards the user id; a missing/invalid header means the
/// caller must prompt sign-in
pub fn require_user(req: &HttpRequest) -> Result<Uuid, GymsError> {
    req.headers()
        .get("X-User-Id")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| {
            log::warn!("Request without a valid X-User-Id header");
            GymsError::Unauthenticated
        })
}
