// src/handlers/gyms.rs
// DOCUMENTATION: HTTP handlers for gym operations
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::db::{GymRepository, MachineRepository};
use crate::errors::GymsError;
use crate::models::{CreateGymRequest, CreateMachineRequest, GymSearchQuery, UpdateGymDetailsRequest};
use crate::services::{KakaoLocalClient, SearchService};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /gyms/search
/// Combined search over the store and the Kakao Local API
pub async fn search_gyms(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<GymSearchQuery>,
) -> Result<impl Responder, GymsError> {
    let kakao = KakaoLocalClient::new(config.kakao_rest_api_key.clone());
    let result = SearchService::search(
        pool.get_ref(),
        &kakao,
        &config.default_area,
        query.into_inner(),
    )
    .await;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /gyms
/// Default feed - best-rated gyms first
pub async fn list_gyms(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, GymsError> {
    let gyms = GymRepository::list_gyms(pool.get_ref(), query.limit.unwrap_or(50)).await?;
    let responses: Vec<_> = gyms.iter().map(|g| g.to_response()).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// GET /gyms/{id}
/// Retrieve a gym by ID (UUID or Kakao place ID) with machines and reviews
pub async fn get_gym(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, GymsError> {
    let identifier = path.into_inner();
    let detail = SearchService::get_gym_detail(pool.get_ref(), &identifier).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /gyms
/// Create a new gym record directly
pub async fn create_gym(
    pool: web::Data<PgPool>,
    req: web::Json<CreateGymRequest>,
) -> Result<impl Responder, GymsError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(GymsError::ValidationFailed(e.to_string()));
    }

    let gym = GymRepository::create_gym(pool.get_ref(), &req.into_inner()).await?;
    Ok(HttpResponse::Created().json(gym.to_response()))
}

/// PUT /gyms/{id}/details
/// Update a gym's facility details
pub async fn update_gym_details(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateGymDetailsRequest>,
) -> Result<impl Responder, GymsError> {
    if let Err(e) = req.validate() {
        return Err(GymsError::ValidationFailed(e.to_string()));
    }

    let gym =
        GymRepository::update_details(pool.get_ref(), path.into_inner(), &req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gym.to_response()))
}

/// GET /gyms/{id}/machines
pub async fn list_machines(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    let gym_id = path.into_inner();
    let machines = MachineRepository::get_machines_by_gym(pool.get_ref(), &gym_id).await?;
    let responses: Vec<_> = machines.iter().map(|m| m.to_response()).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// POST /gyms/{id}/machines
pub async fn add_machine(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<CreateMachineRequest>,
) -> Result<impl Responder, GymsError> {
    if let Err(e) = req.validate() {
        return Err(GymsError::ValidationFailed(e.to_string()));
    }

    // The gym must exist before machines attach to it
    let gym_id = path.into_inner();
    let _ = GymRepository::get_by_id(pool.get_ref(), gym_id).await?;

    let machine =
        MachineRepository::create_machine(pool.get_ref(), gym_id, &req.into_inner()).await?;
    Ok(HttpResponse::Created().json(machine.to_response()))
}

/// DELETE /machines/{id}
pub async fn delete_machine(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GymsError> {
    MachineRepository::delete_machine(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for gym routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gyms")
            .route("", web::get().to(list_gyms))
            .route("", web::post().to(create_gym))
            .route("/search", web::get().to(search_gyms))
            .route("/{id}", web::get().to(get_gym))
            .route("/{id}/details", web::put().to(update_gym_details))
            .route("/{id}/machines", web::get().to(list_machines))
            .route("/{id}/machines", web::post().to(add_machine)),
    )
    .route("/machines/{id}", web::delete().to(delete_machine));
}
