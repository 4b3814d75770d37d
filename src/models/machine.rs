// src/models/machine.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A machine entry attached to a gym
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Machine {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub brand: String,
    pub model: Option<String>,
    pub count: i32,
    pub condition: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to register a machine at a gym
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMachineRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    pub model: Option<String>,
    #[validate(range(min = 1))]
    pub count: i32,
    pub condition: Option<String>,
}

/// Machine response DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct MachineResponse {
    pub id: Uuid,
    pub brand: String,
    pub model: Option<String>,
    pub count: i32,
    pub condition: Option<String>,
}

impl Machine {
    /// Convert database Machine into API response
    pub fn to_response(&self) -> MachineResponse {
        MachineResponse {
            id: self.id,
            brand: self.brand.clone(),
            model: self.model.clone(),
            count: self.count,
            condition: self.condition.clone(),
        }
    }
}
