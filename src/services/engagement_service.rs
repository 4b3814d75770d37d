// src/services/engagement_service.rs
// DOCUMENTATION: Like/bookmark toggle business logic
// PURPOSE: Idempotent relation toggles plus the optimistic like counter

use crate::db::{EngagementRepository, GymRepository};
use crate::errors::GymsError;
use crate::models::{EngagementKind, GymResponse, ToggleResponse};
use crate::services::session_cache::SessionCache;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

pub struct EngagementService;

impl EngagementService {
    /// Toggle a like/bookmark relation for an authenticated user
    /// DOCUMENTATION: Existence check then delete-or-insert; repeated calls
    /// alternate the state. The store's unique (gym_id, user_id) key is the
    /// only guard against concurrent duplicates.
    pub async fn toggle(
        pool: &PgPool,
        cache: &SessionCache,
        kind: EngagementKind,
        gym_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResponse, GymsError> {
        // The gym must exist; also gives us the current display counter
        let gym = GymRepository::get_by_id(pool, gym_id).await?;

        let exists = EngagementRepository::exists(pool, kind, gym_id, user_id).await?;

        let active = if exists {
            EngagementRepository::delete(pool, kind, gym_id, user_id).await?;
            false
        } else {
            EngagementRepository::insert(pool, kind, gym_id, user_id).await?;
            true
        };

        // Likes adjust the displayed counter optimistically. This is a
        // display approximation, not an aggregate - a counter write failure
        // does not undo the toggle.
        let thumbs_up = if kind == EngagementKind::Like {
            let delta = if active { 1 } else { -1 };
            match GymRepository::adjust_thumbs_up(pool, gym_id, delta).await {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Thumbs counter update failed for gym {}: {}", gym_id, e);
                    Some(Self::optimistic_thumbs(gym.thumbs_up, active))
                }
            }
        } else {
            None
        };

        if kind == EngagementKind::Like {
            cache.apply_like_toggle(user_id, gym_id, active).await;
        }

        log::info!(
            "Toggled {:?} for gym {} by user {}: active={}",
            kind,
            gym_id,
            user_id,
            active
        );

        Ok(ToggleResponse { active, thumbs_up })
    }

    /// Next displayed like counter after a toggle, floored at zero
    pub fn optimistic_thumbs(current: i32, active: bool) -> i32 {
        if active {
            current + 1
        } else {
            (current - 1).max(0)
        }
    }

    /// Whether the relation currently exists
    pub async fn is_engaged(
        pool: &PgPool,
        kind: EngagementKind,
        gym_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, GymsError> {
        EngagementRepository::exists(pool, kind, gym_id, user_id).await
    }

    /// Gyms the user has engaged with, newest relation first
    pub async fn gyms_for_user(
        pool: &PgPool,
        kind: EngagementKind,
        user_id: Uuid,
    ) -> Result<Vec<GymResponse>, GymsError> {
        let gyms = EngagementRepository::gyms_for_user(pool, kind, user_id).await?;
        Ok(gyms.iter().map(|g| g.to_response()).collect())
    }

    /// Liked gym ids for a user, served from the session cache when fresh
    /// and mirrored back after a store read
    pub async fn liked_ids(
        pool: &PgPool,
        cache: &SessionCache,
        user_id: Uuid,
    ) -> Result<HashSet<Uuid>, GymsError> {
        if let Some(cached) = cache.get_liked_set(user_id).await {
            return Ok(cached);
        }

        let ids: HashSet<Uuid> =
            EngagementRepository::gym_ids_for_user(pool, EngagementKind::Like, user_id)
                .await?
                .into_iter()
                .collect();

        cache.set_liked_set(user_id, ids.clone()).await;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimistic_thumbs_adjustment() {
        assert_eq!(EngagementService::optimistic_thumbs(3, true), 4);
        assert_eq!(EngagementService::optimistic_thumbs(3, false), 2);
    }

    #[test]
    fn test_optimistic_thumbs_floors_at_zero() {
        assert_eq!(EngagementService::optimistic_thumbs(0, false), 0);
    }
}
