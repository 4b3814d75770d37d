// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for the review wizard and review CRUD
// PURPOSE: Drive wizard sessions held in the session cache; persist on submit

use crate::db::ReviewRepository;
use crate::errors::GymsError;
use crate::handlers::require_user;
use crate::models::UpdateReviewRequest;
use crate::services::review_wizard::{Recommendation, ReviewWizard, SelectedGym, WizardStep};
use crate::services::{ReviewService, SessionCache};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Basic-info step input (mirrors the form events: price typed, day tapped)
#[derive(Debug, Deserialize)]
pub struct BasicInfoRequest {
    pub daily_price: Option<i32>,
    pub toggle_holiday: Option<String>,
    pub add_photo: Option<String>,
}

/// Detailed-info step input
#[derive(Debug, Deserialize)]
pub struct DetailedInfoRequest {
    pub power_rack_count: Option<i32>,
    pub smith_rack_count: Option<i32>,
    pub dumbbell_max_weight: Option<i32>,
    pub toggle_machine_brand: Option<String>,
    pub toggle_amenity: Option<String>,
    pub comment: Option<String>,
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct BackRequest {
    pub step: WizardStep,
}

/// Load a wizard session or fail with NotFound
async fn load_wizard(cache: &SessionCache, session_id: &str) -> Result<ReviewWizard, GymsError> {
    cache.get_wizard(session_id).await.ok_or_else(|| {
        GymsError::NotFound(format!("wizard session '{}' not found", session_id))
    })
}

/// POST /reviews/wizard
/// Start a new wizard session
pub async fn start_wizard(cache: web::Data<Arc<SessionCache>>) -> Result<impl Responder, GymsError> {
    let session_id = cache.create_wizard().await;
    Ok(HttpResponse::Created().json(json!({
        "session_id": session_id,
        "step": WizardStep::SelectGym,
    })))
}

/// GET /reviews/wizard/{id}
/// Current wizard state (step + draft)
pub async fn get_wizard(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
) -> Result<impl Responder, GymsError> {
    let wizard = load_wizard(cache.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(wizard))
}

/// DELETE /reviews/wizard/{id}
/// Discard the draft (navigation away)
pub async fn discard_wizard(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
) -> Result<impl Responder, GymsError> {
    cache.remove_wizard(&path.into_inner()).await;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /reviews/wizard/{id}/gym
/// Select the gym under review (registered record or external place)
pub async fn select_gym(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
    body: web::Json<SelectedGym>,
) -> Result<impl Responder, GymsError> {
    let session_id = path.into_inner();
    let mut wizard = load_wizard(cache.get_ref(), &session_id).await?;

    wizard.select_gym(body.into_inner())?;
    cache.put_wizard(&session_id, wizard.clone()).await;
    Ok(HttpResponse::Ok().json(wizard))
}

/// PUT /reviews/wizard/{id}/basic
/// Apply basic-info inputs to the draft
pub async fn put_basic_info(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
    body: web::Json<BasicInfoRequest>,
) -> Result<impl Responder, GymsError> {
    let session_id = path.into_inner();
    let mut wizard = load_wizard(cache.get_ref(), &session_id).await?;
    let body = body.into_inner();

    if let Some(price) = body.daily_price {
        wizard.set_daily_price(price)?;
    }
    if let Some(day) = body.toggle_holiday {
        wizard.toggle_holiday(&day)?;
    }
    if let Some(url) = body.add_photo {
        wizard.add_photo(url)?;
    }

    cache.put_wizard(&session_id, wizard.clone()).await;
    Ok(HttpResponse::Ok().json(wizard))
}

/// PUT /reviews/wizard/{id}/detailed
/// Apply detailed-info inputs to the draft
pub async fn put_detailed_info(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
    body: web::Json<DetailedInfoRequest>,
) -> Result<impl Responder, GymsError> {
    let session_id = path.into_inner();
    let mut wizard = load_wizard(cache.get_ref(), &session_id).await?;
    let body = body.into_inner();

    match (body.power_rack_count, body.smith_rack_count) {
        (Some(power), Some(smith)) => wizard.set_rack_counts(power, smith)?,
        (None, None) => {}
        _ => {
            return Err(GymsError::ValidationFailed(
                "power_rack_count and smith_rack_count must be provided together".into(),
            ))
        }
    }
    if let Some(kg) = body.dumbbell_max_weight {
        wizard.set_dumbbell_max_weight(kg)?;
    }
    if let Some(brand) = body.toggle_machine_brand {
        wizard.toggle_machine_brand(&brand)?;
    }
    if let Some(amenity) = body.toggle_amenity {
        wizard.toggle_amenity(&amenity)?;
    }
    if let Some(comment) = body.comment {
        wizard.set_comment(&comment)?;
    }
    if let Some(rec) = body.recommendation {
        wizard.set_recommendation(rec)?;
    }

    cache.put_wizard(&session_id, wizard.clone()).await;
    Ok(HttpResponse::Ok().json(wizard))
}

/// POST /reviews/wizard/{id}/advance
/// Move forward one step (refused while required fields are missing)
pub async fn advance_wizard(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
) -> Result<impl Responder, GymsError> {
    let session_id = path.into_inner();
    let mut wizard = load_wizard(cache.get_ref(), &session_id).await?;

    wizard.advance()?;
    cache.put_wizard(&session_id, wizard.clone()).await;
    Ok(HttpResponse::Ok().json(wizard))
}

/// POST /reviews/wizard/{id}/back
/// Navigate back to an earlier step, keeping the draft
pub async fn back_wizard(
    cache: web::Data<Arc<SessionCache>>,
    path: web::Path<String>,
    body: web::Json<BackRequest>,
) -> Result<impl Responder, GymsError> {
    let session_id = path.into_inner();
    let mut wizard = load_wizard(cache.get_ref(), &session_id).await?;

    wizard.back_to(body.step)?;
    cache.put_wizard(&session_id, wizard.clone()).await;
    Ok(HttpResponse::Ok().json(wizard))
}

/// POST /reviews/wizard/{id}/submit
/// Finalize and persist the review
/// On a store failure the wizard stays in DetailedInfo with the draft intact
pub async fn submit_wizard(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<SessionCache>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    let session_id = path.into_inner();
    let mut wizard = load_wizard(cache.get_ref(), &session_id).await?;

    let submission = wizard.finalize(user_id)?;
    let review = ReviewService::submit(pool.get_ref(), submission).await?;

    // Only after the store write succeeds
    wizard.mark_submitted();
    cache.put_wizard(&session_id, wizard).await;

    Ok(HttpResponse::Created().json(review))
}

/// GET /gyms/{id}/reviews
pub async fn gym_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let gym_id = path.into_inner();
    let reviews = ReviewRepository::get_reviews_by_gym(pool.get_ref(), &gym_id).await?;
    let responses: Vec<_> = reviews.iter().map(|r| r.to_response()).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// GET /users/{id}/reviews
pub async fn user_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let user_id = path.into_inner();
    let reviews = ReviewRepository::get_reviews_by_user(pool.get_ref(), &user_id).await?;
    let responses: Vec<_> = reviews.iter().map(|r| r.to_response()).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// PUT /reviews/{id}
/// Edit one of the signed-in user's reviews
pub async fn update_review(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReviewRequest>,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    if let Err(e) = body.validate() {
        return Err(GymsError::ValidationFailed(e.to_string()));
    }

    let review =
        ReviewService::update_review(pool.get_ref(), path.into_inner(), user_id, &body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /reviews/{id}
/// Delete one of the signed-in user's reviews
pub async fn delete_review(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let user_id = require_user(&req)?;
    ReviewService::delete_review(pool.get_ref(), path.into_inner(), user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for review routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("/wizard", web::post().to(start_wizard))
            .route("/wizard/{id}", web::get().to(get_wizard))
            .route("/wizard/{id}", web::delete().to(discard_wizard))
            .route("/wizard/{id}/gym", web::put().to(select_gym))
            .route("/wizard/{id}/basic", web::put().to(put_basic_info))
            .route("/wizard/{id}/detailed", web::put().to(put_detailed_info))
            .route("/wizard/{id}/advance", web::post().to(advance_wizard))
            .route("/wizard/{id}/back", web::post().to(back_wizard))
            .route("/wizard/{id}/submit", web::post().to(submit_wizard))
            .route("/{id}", web::put().to(update_review))
            .route("/{id}", web::delete().to(delete_review)),
    )
    .route("/gyms/{id}/reviews", web::get().to(gym_reviews))
    .route("/users/{id}/reviews", web::get().to(user_reviews));
}
