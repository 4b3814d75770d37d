// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Handle CRUD operations for gym reviews

use crate::errors::GymsError;
use crate::models::{CreateReviewRequest, Review, UpdateReviewRequest};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Create a new review
    /// DOCUMENTATION: One row per wizard submission
    pub async fn create_review(
        pool: &PgPool,
        req: &CreateReviewRequest,
    ) -> Result<Review, GymsError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                gym_id, user_id, rating, content, images, recommendation,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(req.gym_id)
        .bind(req.user_id)
        .bind(req.rating)
        .bind(&req.content)
        .bind(&req.images)
        .bind(&req.recommendation)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create review: {}", e);
            GymsError::StoreWriteFailed(format!("Create review failed: {}", e))
        })?;

        Ok(review)
    }

    /// Get reviews for a gym, newest first
    pub async fn get_reviews_by_gym(
        pool: &PgPool,
        gym_id: &Uuid,
    ) -> Result<Vec<Review>, GymsError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE gym_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(gym_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for gym {}: {}", gym_id, e);
            GymsError::StoreQueryFailed(format!("Fetch reviews failed: {}", e))
        })
    }

    /// Get a user's reviews, newest first
    pub async fn get_reviews_by_user(
        pool: &PgPool,
        user_id: &Uuid,
    ) -> Result<Vec<Review>, GymsError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for user {}: {}", user_id, e);
            GymsError::StoreQueryFailed(format!("Fetch reviews failed: {}", e))
        })
    }

    /// Edit an existing review
    /// Only provided fields are modified; the review must belong to the user
    pub async fn update_review(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: &UpdateReviewRequest,
    ) -> Result<Review, GymsError> {
        sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = COALESCE($1, rating),
                content = COALESCE($2, content),
                images = COALESCE($3, images),
                updated_at = NOW()
            WHERE id = $4 AND user_id = $5
            RETURNING *
            "#,
        )
        .bind(req.rating)
        .bind(&req.content)
        .bind(&req.images)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update review {}: {}", id, e);
            GymsError::StoreWriteFailed(format!("Update review failed: {}", e))
        })?
        .ok_or_else(|| GymsError::NotFound(id.to_string()))
    }

    /// Delete a review; the review must belong to the user
    /// Returns the gym id so callers can refresh aggregates
    pub async fn delete_review(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Uuid, GymsError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "DELETE FROM reviews WHERE id = $1 AND user_id = $2 RETURNING gym_id",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to delete review {}: {}", id, e);
            GymsError::StoreWriteFailed(format!("Delete review failed: {}", e))
        })?;

        row.map(|(gym_id,)| gym_id)
            .ok_or_else(|| GymsError::NotFound(id.to_string()))
    }
}
