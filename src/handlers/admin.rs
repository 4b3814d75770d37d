// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for sync operations
// PURPOSE: Expose sync functionality via REST endpoints

use crate::config::Config;
use crate::db::GymRepository;
use crate::errors::GymsError;
use crate::services::{KakaoLocalClient, SessionCache, SyncService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;

/// Response for sync status endpoint
#[derive(Debug, Serialize)]
pub struct SyncStatusResponse {
    /// Message describing sync status
    pub message: String,
    /// Total gyms in database
    pub total_gyms: i64,
    /// Gyms added in last 24 hours
    pub recent_additions: i64,
    /// Whether a Kakao credential is configured
    pub provider_configured: bool,
}

/// POST /admin/sync/{area}
/// Trigger synchronization for an area
///
/// DOCUMENTATION: Initiates Kakao import for the specified area
/// Requires admin authentication via X-Admin-Token header
pub async fn sync_area(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, GymsError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    let area = path.into_inner();

    log::info!("Admin sync requested for area: {}", area);

    let kakao = KakaoLocalClient::new(config.kakao_rest_api_key.clone());
    if !kakao.has_credential() {
        return Err(GymsError::InvalidInput(
            "Kakao REST API key not configured".to_string(),
        ));
    }

    let stats = SyncService::sync_area(pool.get_ref(), &kakao, &area).await?;

    log::info!(
        "Sync completed for {}: {} created, {} skipped, {} failed",
        area,
        stats.gyms_created,
        stats.gyms_skipped,
        stats.gyms_failed
    );

    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/sync/batch
/// Trigger synchronization for multiple areas
///
/// DOCUMENTATION: Batch sync operation
#[derive(Debug, Deserialize)]
pub struct BatchSyncRequest {
    /// List of area names to sync
    pub areas: Vec<String>,
}

pub async fn sync_areas_batch(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<BatchSyncRequest>,
) -> Result<impl Responder, GymsError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    log::info!("Admin batch sync requested for {} areas", body.areas.len());

    let kakao = KakaoLocalClient::new(config.kakao_rest_api_key.clone());
    if !kakao.has_credential() {
        return Err(GymsError::InvalidInput(
            "Kakao REST API key not configured".to_string(),
        ));
    }

    let stats_list = SyncService::sync_areas(pool.get_ref(), &kakao, &body.areas).await;

    // Aggregate statistics
    let aggregated = SyncService::aggregate_stats(&stats_list);

    log::info!(
        "Batch sync completed: {} total created, {} total skipped, {} total failed",
        aggregated.gyms_created,
        aggregated.gyms_skipped,
        aggregated.gyms_failed
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "summary": aggregated,
        "details": stats_list,
    })))
}

/// GET /admin/sync/status
/// Get sync status and database statistics
pub async fn sync_status(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, GymsError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    let total_gyms = GymRepository::count_all(pool.get_ref()).await?;
    let recent_additions = GymRepository::count_recent(pool.get_ref()).await?;

    let kakao = KakaoLocalClient::new(config.kakao_rest_api_key.clone());

    let response = SyncStatusResponse {
        message: "Sync service operational".to_string(),
        total_gyms,
        recent_additions,
        provider_configured: kakao.has_credential(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /admin/stats
/// Get detailed database statistics
pub async fn database_stats(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, GymsError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    // Gym counts by district
    #[derive(Debug, Serialize, sqlx::FromRow)]
    struct DistrictCount {
        city: Option<String>,
        district: Option<String>,
        count: Option<i64>,
    }

    let district_counts: Vec<DistrictCount> = sqlx::query_as(
        r#"
        SELECT city, district, COUNT(*) as count
        FROM gyms
        GROUP BY city, district
        ORDER BY count DESC
        LIMIT 20
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| GymsError::StoreQueryFailed(e.to_string()))?;

    // Average rating over reviewed gyms
    let avg_rating: (Option<f64>,) = sqlx::query_as(
        "SELECT AVG(rating)::float8 FROM gyms WHERE review_count > 0",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| GymsError::StoreQueryFailed(e.to_string()))?;

    // Review volume
    let total_reviews: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| GymsError::StoreQueryFailed(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "gyms_by_district": district_counts,
        "average_rating": avg_rating.0,
        "total_reviews": total_reviews.0,
    })))
}

/// GET /admin/gyms/{id}/raw
/// Get raw gym data for debugging
///
/// DOCUMENTATION: Returns the database record plus a fresh provider lookup
/// Useful for debugging mapping issues
pub async fn get_gym_raw(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> Result<impl Responder, GymsError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    let gym_id = path.into_inner();
    let gym = GymRepository::get_by_id(pool.get_ref(), gym_id).await?;

    // If the record is correlated, try to fetch fresh data from Kakao
    let mut kakao_data = None;
    if let Some(ref place_id) = gym.kakao_place_id {
        let kakao = KakaoLocalClient::new(config.kakao_rest_api_key.clone());
        if kakao.has_credential() {
            match kakao
                .keyword_search(&gym.name, gym.longitude, gym.latitude, Some(500))
                .await
            {
                Ok(documents) => {
                    kakao_data = documents.into_iter().find(|d| &d.id == place_id);
                }
                Err(e) => {
                    log::warn!("Could not fetch Kakao data for {}: {}", place_id, e);
                }
            }
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "gym_id": gym_id,
        "database_record": gym,
        "kakao_data": kakao_data,
        "note": "This endpoint exposes internal fields for debugging. Do not use in production API."
    })))
}

/// GET /admin/cache/stats
/// Session cache statistics
pub async fn cache_stats(
    config: web::Data<Config>,
    cache: web::Data<Arc<SessionCache>>,
    req: HttpRequest,
) -> Result<impl Responder, GymsError> {
    verify_admin_token(&req, &config)?;

    let stats = cache.stats().await;
    Ok(HttpResponse::Ok().json(stats))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), GymsError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            GymsError::Unauthenticated
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(GymsError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/sync/batch", web::post().to(sync_areas_batch))
            .route("/sync/status", web::get().to(sync_status))
            .route("/sync/{area}", web::post().to(sync_area))
            .route("/stats", web::get().to(database_stats))
            .route("/gyms/{id}/raw", web::get().to(get_gym_raw))
            .route("/cache/stats", web::get().to(cache_stats)),
    );
}
