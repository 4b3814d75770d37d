// src/models/gym.rs
// DOCUMENTATION: Core data structures for gyms
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::kakao_client::KakaoPlace;

/// Represents a complete gym record from the database
/// DOCUMENTATION: This struct maps directly to the gyms table in PostgreSQL
/// Used for internal operations and database queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gym {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Gym name - required field for all gyms
    pub name: String,

    /// Free-text address shown in listings
    pub location: String,

    /// 시/도 parsed from the address (e.g. 서울시)
    pub city: Option<String>,

    /// 구/군 parsed from the address (e.g. 광진구)
    pub district: Option<String>,

    /// 동/읍/면 parsed from the address (e.g. 구의동)
    pub dong: Option<String>,

    /// Geographic coordinates
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Aggregate rating (0-5), refreshed from the reviews table
    pub rating: f32,

    /// Number of reviews backing the rating
    pub review_count: i32,

    /// Like counters shown on cards (display approximation, see engagement)
    pub thumbs_up: i32,
    pub thumbs_down: i32,

    /// Kakao place identifier (correlation key for deduplication)
    pub kakao_place_id: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Kakao place detail page URL
    pub place_url: Option<String>,

    /// Where the record came from: kakao, user, seed
    pub data_source: Option<String>,

    /// One-day pass price in KRW
    pub daily_price: Option<i32>,

    /// Regular closing days (weekday labels, or the single entry "없음")
    pub regular_holidays: Option<Vec<String>>,

    /// Power rack count reported by reviewers
    pub power_rack_count: Option<i32>,

    /// Smith rack count reported by reviewers
    pub smith_rack_count: Option<i32>,

    /// Heaviest dumbbell available, in kg
    pub dumbbell_max_weight: Option<i32>,

    /// Machine brand labels present at the gym
    pub machine_brands: Option<Vec<String>>,

    /// Amenity labels (parking, ice machine, ...)
    pub amenities: Option<Vec<String>>,

    /// Whether the facility details were staff-verified
    pub is_verified: Option<bool>,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a new gym
/// DOCUMENTATION: Data transfer object for POST /gyms and kakao imports
/// Used for API input validation and database inserts
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateGymRequest {
    /// Gym name (required)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Free-text address (required)
    #[validate(length(min = 1, max = 500))]
    pub location: String,

    /// Parsed region parts
    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub district: Option<String>,

    #[serde(default)]
    pub dong: Option<String>,

    /// Geographic coordinates
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Kakao place ID (for deduplication)
    #[serde(default)]
    pub kakao_place_id: Option<String>,

    /// Kakao place detail page URL
    #[serde(default)]
    pub place_url: Option<String>,

    /// Record origin: kakao, user, seed
    #[serde(default)]
    pub data_source: Option<String>,
}

/// Request DTO for updating a gym's facility details
/// DOCUMENTATION: Data transfer object for PUT /gyms/{id}/details
/// All fields are optional - only provided fields are updated
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateGymDetailsRequest {
    /// One-day pass price in KRW
    #[validate(range(min = 1))]
    pub daily_price: Option<i32>,

    /// Regular closing days
    pub regular_holidays: Option<Vec<String>>,

    /// Power rack count
    #[validate(range(min = 0))]
    pub power_rack_count: Option<i32>,

    /// Smith rack count
    #[validate(range(min = 0))]
    pub smith_rack_count: Option<i32>,

    /// Heaviest dumbbell in kg
    #[validate(range(min = 0))]
    pub dumbbell_max_weight: Option<i32>,

    /// Machine brand labels
    pub machine_brands: Option<Vec<String>>,

    /// Amenity labels
    pub amenities: Option<Vec<String>>,
}

/// Response DTO for API responses
/// DOCUMENTATION: Data transfer object for GET endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymResponse {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub city: Option<String>,
    pub district: Option<String>,
    pub dong: Option<String>,

    /// Geographic coordinates
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Aggregates
    pub rating: f32,
    pub review_count: i32,
    pub thumbs_up: i32,
    pub thumbs_down: i32,

    /// Kakao integration
    pub kakao_place_id: Option<String>,
    pub phone: Option<String>,
    pub place_url: Option<String>,
    pub data_source: Option<String>,

    /// Facility details collected from reviews
    pub daily_price: Option<i32>,
    pub regular_holidays: Option<Vec<String>>,
    pub power_rack_count: Option<i32>,
    pub smith_rack_count: Option<i32>,
    pub dumbbell_max_weight: Option<i32>,
    pub machine_brands: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub is_verified: Option<bool>,

    /// Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detailed response DTO
/// DOCUMENTATION: Extended response with associated collections
/// Used for GET /gyms/{id} endpoint
#[derive(Debug, Serialize)]
pub struct GymDetailResponse {
    #[serde(flatten)]
    pub gym: GymResponse,
    pub machines: Vec<super::MachineResponse>,
    pub reviews: Vec<super::ReviewResponse>,
}

/// Search query parameters
/// DOCUMENTATION: DTO for parsing query string in /gyms/search endpoint
#[derive(Debug, Deserialize)]
pub struct GymSearchQuery {
    /// Free-text location or gym-name fragment; empty uses the default area
    pub q: Option<String>,

    /// User coordinates, used only to bias/sort live results
    pub lat: Option<f64>,
    pub lng: Option<f64>,

    /// When true, live results are upserted into the store (fire-and-forget)
    #[serde(default)]
    pub save: bool,

    /// Max registered results (default 20, max 100)
    pub limit: Option<i64>,
}

/// Outcome of the live (provider) branch of a search
/// DOCUMENTATION: Distinct from emptiness so callers can render a
/// configuration hint banner instead of "no results"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    /// Results came from the Kakao Local API
    Live,
    /// Credential missing/invalid - static fallback sample served
    FallbackCredential,
    /// Provider call failed - static fallback sample served
    FallbackError,
}

/// One entry of the merged search result list
/// DOCUMENTATION: Tagged view model over both sources. Registered rows come
/// from the store; live rows are transient provider documents.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DisplayGym {
    Registered(GymResponse),
    Live(LivePlace),
}

impl DisplayGym {
    /// Correlation key linking a live document to a registered row
    pub fn correlation_key(&self) -> Option<&str> {
        match self {
            DisplayGym::Registered(gym) => gym.kakao_place_id.as_deref(),
            DisplayGym::Live(place) => Some(place.kakao_place_id.as_str()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DisplayGym::Registered(gym) => &gym.name,
            DisplayGym::Live(place) => &place.name,
        }
    }
}

/// Live place normalized for display
/// DOCUMENTATION: Provider document trimmed to the fields listings render
#[derive(Debug, Clone, Serialize)]
pub struct LivePlace {
    pub kakao_place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_m: Option<i32>,
    pub place_url: Option<String>,
}

impl LivePlace {
    /// Normalize a raw provider document into the display shape
    pub fn from_kakao(place: &KakaoPlace) -> Self {
        LivePlace {
            kakao_place_id: place.id.clone(),
            name: place.place_name.clone(),
            address: if place.road_address_name.is_empty() {
                place.address_name.clone()
            } else {
                place.road_address_name.clone()
            },
            phone: if place.phone.is_empty() {
                None
            } else {
                Some(place.phone.clone())
            },
            latitude: place.latitude(),
            longitude: place.longitude(),
            distance_m: place.distance_meters(),
            place_url: if place.place_url.is_empty() {
                None
            } else {
                Some(place.place_url.clone())
            },
        }
    }
}

/// Combined search response
/// DOCUMENTATION: DTO for /gyms/search - registered rows first, then live
#[derive(Debug, Serialize)]
pub struct GymSearchResponse {
    /// Merged, deduplicated result list
    pub results: Vec<DisplayGym>,

    /// How many entries came from the store
    pub registered_count: usize,

    /// How many entries came from the provider (or fallback)
    pub live_count: usize,

    /// Outcome of the provider branch
    pub provider_status: ProviderStatus,

    /// Area the search actually ran against
    pub area: String,
}

impl Gym {
    /// Convert Gym to GymResponse for API
    /// DOCUMENTATION: Maps database model to API response DTO
    pub fn to_response(&self) -> GymResponse {
        GymResponse {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            dong: self.dong.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            rating: self.rating,
            review_count: self.review_count,
            thumbs_up: self.thumbs_up,
            thumbs_down: self.thumbs_down,
            kakao_place_id: self.kakao_place_id.clone(),
            phone: self.phone.clone(),
            place_url: self.place_url.clone(),
            data_source: self.data_source.clone(),
            daily_price: self.daily_price,
            regular_holidays: self.regular_holidays.clone(),
            power_rack_count: self.power_rack_count,
            smith_rack_count: self.smith_rack_count,
            dumbbell_max_weight: self.dumbbell_max_weight,
            machine_brands: self.machine_brands.clone(),
            amenities: self.amenities.clone(),
            is_verified: self.is_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
