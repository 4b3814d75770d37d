// src/db/engagement_repository.rs
// DOCUMENTATION: Like/bookmark relation database operations
// PURPOSE: Atomic insert/delete over the per-kind relation tables

use crate::errors::GymsError;
use crate::models::{EngagementKind, Gym};
use sqlx::PgPool;
use uuid::Uuid;

/// EngagementRepository: relation-row operations for likes and bookmarks
/// DOCUMENTATION: The table name comes from EngagementKind::table(), a
/// static string, so the format! interpolation cannot carry user input
pub struct EngagementRepository;

impl EngagementRepository {
    /// Whether the relation exists for (gym, user)
    pub async fn exists(
        pool: &PgPool,
        kind: EngagementKind,
        gym_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, GymsError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE gym_id = $1 AND user_id = $2)",
            kind.table()
        );

        let row: (bool,) = sqlx::query_as(&sql)
            .bind(gym_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Relation existence check failed: {}", e);
                GymsError::StoreQueryFailed(e.to_string())
            })?;

        Ok(row.0)
    }

    /// Insert the relation
    /// ON CONFLICT DO NOTHING - the unique (gym_id, user_id) key is the
    /// only guard against concurrent duplicate toggles
    pub async fn insert(
        pool: &PgPool,
        kind: EngagementKind,
        gym_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GymsError> {
        let sql = format!(
            r#"
            INSERT INTO {} (gym_id, user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (gym_id, user_id) DO NOTHING
            "#,
            kind.table()
        );

        sqlx::query(&sql)
            .bind(gym_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Relation insert failed: {}", e);
                GymsError::StoreWriteFailed(e.to_string())
            })?;

        Ok(())
    }

    /// Delete the relation
    pub async fn delete(
        pool: &PgPool,
        kind: EngagementKind,
        gym_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GymsError> {
        let sql = format!(
            "DELETE FROM {} WHERE gym_id = $1 AND user_id = $2",
            kind.table()
        );

        sqlx::query(&sql)
            .bind(gym_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Relation delete failed: {}", e);
                GymsError::StoreWriteFailed(e.to_string())
            })?;

        Ok(())
    }

    /// Gyms a user has engaged with, newest relation first
    pub async fn gyms_for_user(
        pool: &PgPool,
        kind: EngagementKind,
        user_id: Uuid,
    ) -> Result<Vec<Gym>, GymsError> {
        let sql = format!(
            r#"
            SELECT g.* FROM gyms g
            JOIN {} r ON r.gym_id = g.id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
            kind.table()
        );

        sqlx::query_as::<_, Gym>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list gyms for user {}: {}", user_id, e);
                GymsError::StoreQueryFailed(e.to_string())
            })
    }

    /// Gym ids a user has engaged with (session cache mirror)
    pub async fn gym_ids_for_user(
        pool: &PgPool,
        kind: EngagementKind,
        user_id: Uuid,
    ) -> Result<Vec<Uuid>, GymsError> {
        let sql = format!("SELECT gym_id FROM {} WHERE user_id = $1", kind.table());

        let rows: Vec<(Uuid,)> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list gym ids for user {}: {}", user_id, e);
                GymsError::StoreQueryFailed(e.to_string())
            })?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
