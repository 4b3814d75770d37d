// src/db/gym_repository.rs
// DOCUMENTATION: Database access layer - all SQL queries for gyms
// PURPOSE: Abstract database operations from business logic

use crate::errors::GymsError;
use crate::models::{CreateGymRequest, Gym, UpdateGymDetailsRequest};
use sqlx::PgPool;
use uuid::Uuid;

/// GymRepository: All database operations for gyms
/// DOCUMENTATION: Uses query_as for type-safe SQL queries
pub struct GymRepository;

impl GymRepository {
    /// Create new gym in database
    /// DOCUMENTATION: Inserts gym and returns created record
    /// Used by POST /gyms and review submission for unlisted gyms
    pub async fn create_gym(pool: &PgPool, req: &CreateGymRequest) -> Result<Gym, GymsError> {
        let gym = sqlx::query_as::<_, Gym>(
            r#"
            INSERT INTO gyms (
                name, location, city, district, dong,
                latitude, longitude, phone,
                kakao_place_id, place_url, data_source,
                rating, review_count, thumbs_up, thumbs_down,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8,
                $9, $10, $11,
                0, 0, 0, 0,
                NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(&req.name) // $1
        .bind(&req.location) // $2
        .bind(&req.city) // $3
        .bind(&req.district) // $4
        .bind(&req.dong) // $5
        .bind(req.latitude) // $6
        .bind(req.longitude) // $7
        .bind(&req.phone) // $8
        .bind(&req.kakao_place_id) // $9
        .bind(&req.place_url) // $10
        .bind(&req.data_source) // $11
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create gym: {}", e);
            GymsError::StoreWriteFailed(e.to_string())
        })?;

        log::info!("Created gym with id: {}", gym.id);
        Ok(gym)
    }

    /// Insert-if-absent keyed on the Kakao place id
    /// Existing rows are left unchanged; the bool reports whether a new
    /// row was created
    pub async fn upsert_kakao_gym(
        pool: &PgPool,
        req: &CreateGymRequest,
    ) -> Result<(Gym, bool), GymsError> {
        let kakao_id = req.kakao_place_id.as_ref().ok_or_else(|| {
            GymsError::InvalidInput("kakao_place_id is required for upsert".into())
        })?;

        let inserted = sqlx::query_as::<_, Gym>(
            r#"
            INSERT INTO gyms (
                name, location, city, district, dong,
                latitude, longitude, phone,
                kakao_place_id, place_url, data_source,
                rating, review_count, thumbs_up, thumbs_down,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8,
                $9, $10, $11,
                0, 0, 0, 0,
                NOW(), NOW()
            )
            ON CONFLICT (kakao_place_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.location)
        .bind(&req.city)
        .bind(&req.district)
        .bind(&req.dong)
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.phone)
        .bind(&req.kakao_place_id)
        .bind(&req.place_url)
        .bind(&req.data_source)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert gym {}: {}", kakao_id, e);
            GymsError::StoreWriteFailed(e.to_string())
        })?;

        if let Some(gym) = inserted {
            return Ok((gym, true));
        }

        // Conflict - fetch the existing record as-is
        let existing = Self::get_by_kakao_place_id(pool, kakao_id).await?;
        Ok((existing, false))
    }

    /// Retrieve gym by ID
    /// DOCUMENTATION: Used for GET /gyms/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Gym, GymsError> {
        sqlx::query_as::<_, Gym>("SELECT * FROM gyms WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching gym: {}", e);
                GymsError::StoreQueryFailed(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Gym not found: {}", id);
                GymsError::NotFound(id.to_string())
            })
    }

    /// Retrieve gym by Kakao place ID
    pub async fn get_by_kakao_place_id(
        pool: &PgPool,
        kakao_place_id: &str,
    ) -> Result<Gym, GymsError> {
        sqlx::query_as::<_, Gym>("SELECT * FROM gyms WHERE kakao_place_id = $1")
            .bind(kakao_place_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to get gym by kakao_place_id {}: {}",
                    kakao_place_id,
                    e
                );
                GymsError::StoreQueryFailed(e.to_string())
            })?
            .ok_or_else(|| {
                GymsError::NotFound(format!(
                    "Gym with kakao_place_id '{}' not found",
                    kakao_place_id
                ))
            })
    }

    /// List gyms for the default feed
    /// DOCUMENTATION: Best-rated first; ties broken by review count, then name
    pub async fn list_gyms(pool: &PgPool, limit: i64) -> Result<Vec<Gym>, GymsError> {
        sqlx::query_as::<_, Gym>(
            r#"
            SELECT * FROM gyms
            ORDER BY rating DESC, review_count DESC, name ASC
            LIMIT $1
            "#,
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list gyms: {}", e);
            GymsError::StoreQueryFailed(e.to_string())
        })
    }

    /// Substring search over name and location
    /// DOCUMENTATION: Registered branch of /gyms/search
    /// Same ordering as the default feed
    pub async fn search_registered(
        pool: &PgPool,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Gym>, GymsError> {
        let pattern = format!("%{}%", query);

        sqlx::query_as::<_, Gym>(
            r#"
            SELECT * FROM gyms
            WHERE name ILIKE $1 OR location ILIKE $1
            ORDER BY rating DESC, review_count DESC, name ASC
            LIMIT $2
            "#,
        )
        .bind(&pattern)
        .bind(limit.clamp(1, 100))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Registered search failed for '{}': {}", query, e);
            GymsError::StoreQueryFailed(e.to_string())
        })
    }

    /// Update facility details reported by reviewers
    /// DOCUMENTATION: Partial update - only provided fields are modified
    pub async fn update_details(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateGymDetailsRequest,
    ) -> Result<Gym, GymsError> {
        // Verify gym exists
        let _ = Self::get_by_id(pool, id).await?;

        let gym = sqlx::query_as::<_, Gym>(
            r#"
            UPDATE gyms
            SET daily_price = COALESCE($1, daily_price),
                regular_holidays = COALESCE($2, regular_holidays),
                power_rack_count = COALESCE($3, power_rack_count),
                smith_rack_count = COALESCE($4, smith_rack_count),
                dumbbell_max_weight = COALESCE($5, dumbbell_max_weight),
                machine_brands = COALESCE($6, machine_brands),
                amenities = COALESCE($7, amenities),
                updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(req.daily_price)
        .bind(&req.regular_holidays)
        .bind(req.power_rack_count)
        .bind(req.smith_rack_count)
        .bind(req.dumbbell_max_weight)
        .bind(&req.machine_brands)
        .bind(&req.amenities)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Details update failed for gym {}: {}", id, e);
            GymsError::StoreWriteFailed(e.to_string())
        })?;

        log::info!("Updated details for gym: {}", id);
        Ok(gym)
    }

    /// Adjust the displayed like counter, floored at zero
    /// DOCUMENTATION: Display approximation - not derived from the
    /// relation table (see engagement service)
    pub async fn adjust_thumbs_up(
        pool: &PgPool,
        id: Uuid,
        delta: i32,
    ) -> Result<i32, GymsError> {
        let row: (i32,) = sqlx::query_as(
            r#"
            UPDATE gyms
            SET thumbs_up = GREATEST(0, thumbs_up + $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING thumbs_up
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Thumbs adjust failed for gym {}: {}", id, e);
            GymsError::StoreWriteFailed(e.to_string())
        })?;

        Ok(row.0)
    }

    /// Recompute rating/review_count aggregates from the reviews table
    /// DOCUMENTATION: Called after review create/update/delete
    pub async fn refresh_review_aggregates(pool: &PgPool, gym_id: Uuid) -> Result<(), GymsError> {
        sqlx::query(
            r#"
            UPDATE gyms
            SET rating = COALESCE(
                    (SELECT AVG(rating)::real FROM reviews WHERE gym_id = $1), 0
                ),
                review_count = (SELECT COUNT(*) FROM reviews WHERE gym_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(gym_id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Aggregate refresh failed for gym {}: {}", gym_id, e);
            GymsError::StoreWriteFailed(e.to_string())
        })?;

        Ok(())
    }

    /// Total gym count (admin status)
    pub async fn count_all(pool: &PgPool) -> Result<i64, GymsError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gyms")
            .fetch_one(pool)
            .await
            .map_err(|e| GymsError::StoreQueryFailed(e.to_string()))?;
        Ok(row.0)
    }

    /// Gyms added in the last 24 hours (admin status)
    pub async fn count_recent(pool: &PgPool) -> Result<i64, GymsError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM gyms WHERE created_at > NOW() - INTERVAL '24 hours'",
        )
        .fetch_one(pool)
        .await
        .map_err(|e| GymsError::StoreQueryFailed(e.to_string()))?;
        Ok(row.0)
    }
}
