// src/handlers/engagement.rs
// DOCUMENTATION: HTTP handlers for like/bookmark toggles
// PURPOSE: Authenticated relation toggles and per-user listings

use crate::errors::GymsError;
use crate::handlers::require_user;
use crate::models::EngagementKind;
use crate::services::{EngagementService, SessionCache};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// POST /gyms/{id}/like
/// Toggle the like relation for the signed-in user
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<SessionCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    let result = EngagementService::toggle(
        pool.get_ref(),
        cache.get_ref(),
        EngagementKind::Like,
        path.into_inner(),
        user_id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /gyms/{id}/bookmark
/// Toggle the bookmark relation for the signed-in user
pub async fn toggle_bookmark(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<SessionCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    let result = EngagementService::toggle(
        pool.get_ref(),
        cache.get_ref(),
        EngagementKind::Bookmark,
        path.into_inner(),
        user_id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /gyms/{id}/engagement
/// Both relation states for the signed-in user (card rendering)
pub async fn engagement_status(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    let gym_id = path.into_inner();

    let liked =
        EngagementService::is_engaged(pool.get_ref(), EngagementKind::Like, gym_id, user_id)
            .await?;
    let bookmarked =
        EngagementService::is_engaged(pool.get_ref(), EngagementKind::Bookmark, gym_id, user_id)
            .await?;

    Ok(HttpResponse::Ok().json(json!({
        "liked": liked,
        "bookmarked": bookmarked,
    })))
}

/// GET /me/liked-ids
/// Liked gym ids for the signed-in user (heart icons on cards)
/// Served from the session cache when fresh
pub async fn my_liked_ids(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<SessionCache>>,
    req: HttpRequest,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    let ids = EngagementService::liked_ids(pool.get_ref(), cache.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(ids))
}

/// GET /users/{id}/likes
/// Gyms the user has liked
pub async fn liked_gyms(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let gyms =
        EngagementService::gyms_for_user(pool.get_ref(), EngagementKind::Like, path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(gyms))
}

/// GET /users/{id}/bookmarks
/// Gyms the user has bookmarked
pub async fn bookmarked_gyms(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let gyms = EngagementService::gyms_for_user(
        pool.get_ref(),
        EngagementKind::Bookmark,
        path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(gyms))
}

/// Configuration for engagement routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/gyms/{id}/like", web::post().to(toggle_like))
        .route("/gyms/{id}/bookmark", web::post().to(toggle_bookmark))
        .route("/gyms/{id}/engagement", web::get().to(engagement_status))
        .route("/me/liked-ids", web::get().to(my_liked_ids))
        .route("/users/{id}/likes", web::get().to(liked_gyms))
        .route("/users/{id}/bookmarks", web::get().to(bookmarked_gyms));
}
