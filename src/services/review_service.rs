// src/services/review_service.rs
// DOCUMENTATION: Review persistence business logic
// PURPOSE: Turn wizard submissions into store writes; keep gym aggregates fresh

use crate::db::{GymRepository, ReviewRepository};
use crate::errors::GymsError;
use crate::models::{
    CreateReviewRequest, Gym, ReviewResponse, UpdateGymDetailsRequest, UpdateReviewRequest,
};
use crate::services::kakao_client::KakaoLocalClient;
use crate::services::review_wizard::{ReviewSubmission, SelectedGym};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewService;

impl ReviewService {
    /// Persist a finalized wizard submission
    /// DOCUMENTATION: Resolves the selected gym (an external selection
    /// creates its gym record first), inserts the review, then applies the
    /// reported facility details and refreshes aggregates. The review row
    /// is the operation - a detail/aggregate follow-up failure is logged,
    /// not surfaced.
    pub async fn submit(
        pool: &PgPool,
        submission: ReviewSubmission,
    ) -> Result<ReviewResponse, GymsError> {
        let gym = Self::resolve_gym(pool, &submission.selected_gym).await?;

        let review = ReviewRepository::create_review(
            pool,
            &CreateReviewRequest {
                gym_id: gym.id,
                user_id: submission.user_id,
                rating: submission.rating,
                content: submission.content.clone(),
                images: if submission.images.is_empty() {
                    None
                } else {
                    Some(submission.images.clone())
                },
                recommendation: Some(submission.recommendation.as_str().to_string()),
            },
        )
        .await?;

        let details = UpdateGymDetailsRequest {
            daily_price: Some(submission.daily_price),
            regular_holidays: Some(submission.regular_holidays.clone()),
            power_rack_count: Some(submission.power_rack_count),
            smith_rack_count: Some(submission.smith_rack_count),
            dumbbell_max_weight: submission.dumbbell_max_weight,
            machine_brands: if submission.machine_brands.is_empty() {
                None
            } else {
                Some(submission.machine_brands.clone())
            },
            amenities: if submission.amenities.is_empty() {
                None
            } else {
                Some(submission.amenities.clone())
            },
        };

        if let Err(e) = GymRepository::update_details(pool, gym.id, &details).await {
            log::warn!("Facility detail update failed for gym {}: {}", gym.id, e);
        }

        if let Err(e) = GymRepository::refresh_review_aggregates(pool, gym.id).await {
            log::warn!("Aggregate refresh failed for gym {}: {}", gym.id, e);
        }

        log::info!(
            "Review {} submitted for gym {} by user {}",
            review.id,
            gym.id,
            submission.user_id
        );

        Ok(review.to_response())
    }

    /// Resolve the wizard's gym selection to a store record
    /// A review for an unlisted gym creates the record (insert-if-absent)
    async fn resolve_gym(pool: &PgPool, selection: &SelectedGym) -> Result<Gym, GymsError> {
        match selection {
            SelectedGym::Registered { gym_id } => GymRepository::get_by_id(pool, *gym_id).await,
            SelectedGym::External { place } => {
                let req = KakaoLocalClient::to_create_request(place);
                let (gym, created) = GymRepository::upsert_kakao_gym(pool, &req).await?;
                if created {
                    log::info!("Created gym {} from external selection", gym.id);
                }
                Ok(gym)
            }
        }
    }

    /// Edit an existing review and refresh the gym's aggregates
    pub async fn update_review(
        pool: &PgPool,
        review_id: Uuid,
        user_id: Uuid,
        req: &UpdateReviewRequest,
    ) -> Result<ReviewResponse, GymsError> {
        let review = ReviewRepository::update_review(pool, review_id, user_id, req).await?;

        if let Err(e) = GymRepository::refresh_review_aggregates(pool, review.gym_id).await {
            log::warn!("Aggregate refresh failed for gym {}: {}", review.gym_id, e);
        }

        Ok(review.to_response())
    }

    /// Delete a review and refresh the gym's aggregates
    pub async fn delete_review(
        pool: &PgPool,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GymsError> {
        let gym_id = ReviewRepository::delete_review(pool, review_id, user_id).await?;

        if let Err(e) = GymRepository::refresh_review_aggregates(pool, gym_id).await {
            log::warn!("Aggregate refresh failed for gym {}: {}", gym_id, e);
        }

        Ok(())
    }
}
