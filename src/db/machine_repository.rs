// src/db/machine_repository.rs
// DOCUMENTATION: Machine database operations
// PURPOSE: Handle CRUD operations for gym machine entries

use crate::errors::GymsError;
use crate::models::{CreateMachineRequest, Machine};
use sqlx::PgPool;
use uuid::Uuid;

pub struct MachineRepository;

impl MachineRepository {
    /// Register a machine at a gym
    pub async fn create_machine(
        pool: &PgPool,
        gym_id: Uuid,
        req: &CreateMachineRequest,
    ) -> Result<Machine, GymsError> {
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            INSERT INTO machines (gym_id, brand, model, count, condition)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(gym_id)
        .bind(&req.brand)
        .bind(&req.model)
        .bind(req.count)
        .bind(&req.condition)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create machine: {}", e);
            GymsError::StoreWriteFailed(format!("Create machine failed: {}", e))
        })?;

        Ok(machine)
    }

    /// Get machines for a gym
    pub async fn get_machines_by_gym(
        pool: &PgPool,
        gym_id: &Uuid,
    ) -> Result<Vec<Machine>, GymsError> {
        sqlx::query_as::<_, Machine>(
            r#"
            SELECT * FROM machines
            WHERE gym_id = $1
            ORDER BY brand ASC, created_at ASC
            "#,
        )
        .bind(gym_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch machines for gym {}: {}", gym_id, e);
            GymsError::StoreQueryFailed(format!("Fetch machines failed: {}", e))
        })
    }

    /// Remove a machine entry
    pub async fn delete_machine(pool: &PgPool, machine_id: Uuid) -> Result<(), GymsError> {
        let rows = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(machine_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete machine {}: {}", machine_id, e);
                GymsError::StoreWriteFailed(format!("Delete machine failed: {}", e))
            })?
            .rows_affected();

        if rows == 0 {
            return Err(GymsError::NotFound(machine_id.to_string()));
        }

        Ok(())
    }
}
