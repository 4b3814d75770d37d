// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod engagement_service;
pub mod kakao_client;
pub mod location;
pub mod review_service;
pub mod review_wizard;
pub mod search_service;
pub mod session_cache;
pub mod sync_service;

pub use engagement_service::*;
pub use kakao_client::*;
pub use review_service::*;
pub use review_wizard::*;
pub use search_service::*;
pub use session_cache::*;
pub use sync_service::*;
