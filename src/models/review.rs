// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A user review of a gym
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub recommendation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub gym_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub recommendation: Option<String>,
}

/// Request to edit an existing review
/// Only provided fields are updated
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 500))]
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Review response DTO exposed via API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub recommendation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Convert database Review into API response
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            gym_id: self.gym_id,
            user_id: self.user_id,
            rating: self.rating,
            content: self.content.clone(),
            images: self.images.clone(),
            recommendation: self.recommendation.clone(),
            created_at: self.created_at,
        }
    }
}
