// src/services/kakao_client.rs
// DOCUMENTATION: Kakao Local API client
// PURPOSE: Handle communication with the Kakao keyword-search API for place data

use crate::errors::GymsError;
use crate::models::CreateGymRequest;
use crate::services::location;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Category group code Kakao assigns to fitness facilities
pub const FITNESS_CATEGORY_GROUP: &str = "CT1";

/// A place name must contain one of these to count as a gym
pub const GYM_NAME_MARKERS: [&str; 4] = ["헬스", "피트니스", "짐", "GYM"];

/// Default search radius around user coordinates, in meters
const DEFAULT_RADIUS_M: u32 = 2000;

/// Kakao Local API client
/// DOCUMENTATION: Handles authentication and API calls to Kakao keyword search
pub struct KakaoLocalClient {
    /// HTTP client for making requests
    client: Client,
    /// Kakao REST API key (sent as "KakaoAK {key}")
    rest_api_key: String,
    /// Base URL for the Kakao Local API
    base_url: String,
}

/// Response from Kakao keyword search
/// DOCUMENTATION: Parsed response from the Kakao Local API
#[derive(Debug, Deserialize, Serialize)]
pub struct KakaoSearchResponse {
    /// Result documents
    pub documents: Vec<KakaoPlace>,
    /// Pagination metadata
    pub meta: KakaoSearchMeta,
}

/// Search metadata from Kakao
#[derive(Debug, Deserialize, Serialize)]
pub struct KakaoSearchMeta {
    /// Total matches for the query
    pub total_count: i64,
    /// Matches reachable through pagination
    pub pageable_count: i64,
    /// Whether this page is the last one
    pub is_end: bool,
}

/// Individual place document from the Kakao Local API
/// DOCUMENTATION: Kakao returns coordinates and distance as strings;
/// accessor methods parse them on demand
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KakaoPlace {
    /// Kakao's place identifier (provider-scoped)
    pub id: String,
    /// Place name
    pub place_name: String,
    /// Human-readable category path
    pub category_name: String,
    /// Category group code (CT1 for fitness)
    pub category_group_code: String,
    /// Phone number (may be empty)
    pub phone: String,
    /// Lot-number address
    pub address_name: String,
    /// Road-name address (may be empty)
    pub road_address_name: String,
    /// Longitude as decimal string
    pub x: String,
    /// Latitude as decimal string
    pub y: String,
    /// Kakao place detail page URL (may be empty)
    pub place_url: String,
    /// Distance from the bias point in meters, as string (may be empty)
    pub distance: String,
}

impl KakaoPlace {
    /// Parsed longitude
    pub fn longitude(&self) -> Option<f64> {
        self.x.parse().ok()
    }

    /// Parsed latitude
    pub fn latitude(&self) -> Option<f64> {
        self.y.parse().ok()
    }

    /// Parsed distance in meters (absent without a coordinate bias)
    pub fn distance_meters(&self) -> Option<i32> {
        self.distance.parse().ok()
    }

    /// Whether this document looks like a gym
    /// Category must be CT1 and the name must carry a fitness marker
    pub fn is_fitness_place(&self) -> bool {
        if self.category_group_code != FITNESS_CATEGORY_GROUP {
            return false;
        }
        let name_upper = self.place_name.to_uppercase();
        GYM_NAME_MARKERS.iter().any(|m| name_upper.contains(m))
    }
}

impl KakaoLocalClient {
    /// Create new Kakao Local API client
    pub fn new(rest_api_key: String) -> Self {
        Self {
            client: Client::new(),
            rest_api_key,
            base_url: "https://dapi.kakao.com/v2/local".to_string(),
        }
    }

    /// Whether a plausibly valid credential is configured
    /// DOCUMENTATION: Missing, placeholder, or too-short keys degrade search
    /// to the bundled fallback sample instead of failing
    pub fn has_credential(&self) -> bool {
        !self.rest_api_key.is_empty()
            && self.rest_api_key != "your_kakao_rest_api_key_here"
            && self.rest_api_key.len() >= 10
    }

    /// Keyword search against the Kakao Local API
    /// DOCUMENTATION: Category-filtered keyword search, optionally biased
    /// toward a coordinate
    ///
    /// # Arguments
    /// * `query` - Free-text keyword (e.g. "광진구 헬스장")
    /// * `x` / `y` - Optional bias coordinate (longitude / latitude)
    /// * `radius` - Bias radius in meters (only with coordinates)
    ///
    /// # Returns
    /// Vector of KakaoPlace documents
    pub async fn keyword_search(
        &self,
        query: &str,
        x: Option<f64>,
        y: Option<f64>,
        radius: Option<u32>,
    ) -> Result<Vec<KakaoPlace>, GymsError> {
        let url = format!("{}/search/keyword.json", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("category_group_code", FITNESS_CATEGORY_GROUP.to_string()),
            ("size", "15".to_string()),
            ("sort", "distance".to_string()),
        ];

        // Coordinate-biased search
        if let (Some(x), Some(y)) = (x, y) {
            params.push(("x", x.to_string()));
            params.push(("y", y.to_string()));
            params.push(("radius", radius.unwrap_or(DEFAULT_RADIUS_M).to_string()));
        }

        log::debug!("Kakao keyword search: query={}, biased={}", query, x.is_some());

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.rest_api_key))
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Kakao API request failed: {}", e);
                GymsError::ProviderUnavailable(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Kakao API error {}: {}", status, body);
            if status.as_u16() == 429 {
                return Err(GymsError::RateLimitExceeded);
            }
            return Err(GymsError::ProviderUnavailable(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: KakaoSearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Kakao response: {}", e);
            GymsError::ProviderUnavailable(format!("Parse error: {}", e))
        })?;

        log::info!(
            "Kakao search returned {} documents ({} total)",
            api_response.documents.len(),
            api_response.meta.total_count
        );

        Ok(api_response.documents)
    }

    /// Search for gyms around an area
    /// DOCUMENTATION: Appends the gym keyword to the area and filters the
    /// documents down to actual fitness places
    pub async fn search_fitness(
        &self,
        area: &str,
        x: Option<f64>,
        y: Option<f64>,
    ) -> Result<Vec<KakaoPlace>, GymsError> {
        let query = format!("{} 헬스장", area);
        let documents = self
            .keyword_search(&query, x, y, Some(DEFAULT_RADIUS_M))
            .await?;

        Ok(documents
            .into_iter()
            .filter(|p| p.is_fitness_place())
            .collect())
    }

    /// Static fallback sample served when the provider is unreachable
    /// DOCUMENTATION: Fixed set so degraded mode stays predictable
    pub fn fallback_gyms() -> Vec<KakaoPlace> {
        let rows: [(&str, &str, &str, &str, &str, &str, &str, &str); 6] = [
            (
                "1", "파워존 헬스클럽", "02-1234-5678",
                "서울시 강남구 논현동 123-45", "서울시 강남구 논현로 123",
                "127.0276", "37.4979", "300",
            ),
            (
                "2", "아이언 피트니스", "02-2345-6789",
                "서울시 서초구 서초동 67-89", "서울시 서초구 서초대로 456",
                "127.0324", "37.4947", "800",
            ),
            (
                "3", "스트롱 바디 센터", "02-3456-7890",
                "서울시 강남구 역삼동 12-34", "서울시 강남구 테헤란로 789",
                "127.0285", "37.5003", "1200",
            ),
            (
                "4", "피트니스 월드", "02-4567-8901",
                "서울시 강남구 강남동 56-78", "서울시 강남구 강남대로 321",
                "127.0256", "37.5021", "500",
            ),
            (
                "5", "헬스 마스터", "02-5678-9012",
                "서울시 강남구 도곡동 90-12", "서울시 강남구 도곡로 654",
                "127.0312", "37.4987", "900",
            ),
            (
                "6", "타임짐 성수점", "02-1234-9999",
                "서울시 성동구 성수1동 123-45", "서울시 성동구 성수일로 123",
                "127.0546", "37.5443", "200",
            ),
        ];

        rows.iter()
            .map(|(id, name, phone, addr, road, x, y, dist)| KakaoPlace {
                id: id.to_string(),
                place_name: name.to_string(),
                category_name: "헬스장".to_string(),
                category_group_code: FITNESS_CATEGORY_GROUP.to_string(),
                phone: phone.to_string(),
                address_name: addr.to_string(),
                road_address_name: road.to_string(),
                x: x.to_string(),
                y: y.to_string(),
                place_url: String::new(),
                distance: dist.to_string(),
            })
            .collect()
    }

    /// Convert a KakaoPlace to a CreateGymRequest
    /// DOCUMENTATION: Maps a provider document to an internal creation
    /// request, parsing the address into region parts
    pub fn to_create_request(place: &KakaoPlace) -> CreateGymRequest {
        let address = if place.road_address_name.is_empty() {
            place.address_name.clone()
        } else {
            place.road_address_name.clone()
        };

        // Lot-number addresses carry the 동; prefer them for region parsing
        let parsed = location::parse_location(&place.address_name);

        CreateGymRequest {
            name: place.place_name.clone(),
            location: address,
            city: if parsed.city.is_empty() {
                None
            } else {
                Some(parsed.city)
            },
            district: if parsed.district.is_empty() {
                None
            } else {
                Some(parsed.district)
            },
            dong: if parsed.dong.is_empty() {
                None
            } else {
                Some(parsed.dong)
            },
            latitude: place.latitude(),
            longitude: place.longitude(),
            phone: if place.phone.is_empty() {
                None
            } else {
                Some(place.phone.clone())
            },
            kakao_place_id: Some(place.id.clone()),
            place_url: if place.place_url.is_empty() {
                None
            } else {
                Some(place.place_url.clone())
            },
            data_source: Some("kakao".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, category: &str) -> KakaoPlace {
        KakaoPlace {
            id: "k-1".to_string(),
            place_name: name.to_string(),
            category_name: "스포츠,레저 > 헬스장".to_string(),
            category_group_code: category.to_string(),
            phone: "02-123-4567".to_string(),
            address_name: "서울특별시 광진구 구의동 123-4".to_string(),
            road_address_name: "서울특별시 광진구 아차산로 100".to_string(),
            x: "127.0850".to_string(),
            y: "37.5385".to_string(),
            place_url: "http://place.map.kakao.com/k-1".to_string(),
            distance: "450".to_string(),
        }
    }

    #[test]
    fn test_fitness_filter_accepts_marked_names() {
        assert!(place("강남 헬스클럽", "CT1").is_fitness_place());
        assert!(place("바디 피트니스", "CT1").is_fitness_place());
        assert!(place("파워 짐", "CT1").is_fitness_place());
        assert!(place("Crossfit gym", "CT1").is_fitness_place());
    }

    #[test]
    fn test_fitness_filter_rejects_unmarked_or_wrong_category() {
        // Name without a marker
        assert!(!place("강남 요가원", "CT1").is_fitness_place());
        // Right name, wrong category group
        assert!(!place("강남 헬스클럽", "FD6").is_fitness_place());
    }

    #[test]
    fn test_coordinate_parsing() {
        let p = place("강남 헬스클럽", "CT1");
        assert_eq!(p.longitude(), Some(127.0850));
        assert_eq!(p.latitude(), Some(37.5385));
        assert_eq!(p.distance_meters(), Some(450));

        let mut no_distance = p.clone();
        no_distance.distance = String::new();
        assert_eq!(no_distance.distance_meters(), None);
    }

    #[test]
    fn test_credential_heuristic() {
        assert!(!KakaoLocalClient::new(String::new()).has_credential());
        assert!(!KakaoLocalClient::new("short".to_string()).has_credential());
        assert!(
            !KakaoLocalClient::new("your_kakao_rest_api_key_here".to_string()).has_credential()
        );
        assert!(KakaoLocalClient::new("0123456789abcdef".to_string()).has_credential());
    }

    #[test]
    fn test_fallback_set_is_fixed() {
        let fallback = KakaoLocalClient::fallback_gyms();
        assert_eq!(fallback.len(), 6);
        assert!(fallback.iter().all(|p| p.is_fitness_place()));
        assert_eq!(fallback[0].place_name, "파워존 헬스클럽");
    }

    #[test]
    fn test_to_create_request() {
        let p = place("강남 헬스클럽", "CT1");
        let req = KakaoLocalClient::to_create_request(&p);

        assert_eq!(req.name, "강남 헬스클럽");
        // Road address preferred for display
        assert_eq!(req.location, "서울특별시 광진구 아차산로 100");
        // Region parsed from the lot-number address
        assert_eq!(req.city.as_deref(), Some("서울시"));
        assert_eq!(req.district.as_deref(), Some("광진구"));
        assert_eq!(req.dong.as_deref(), Some("구의동"));
        assert_eq!(req.kakao_place_id.as_deref(), Some("k-1"));
        assert_eq!(req.latitude, Some(37.5385));
        assert_eq!(req.data_source.as_deref(), Some("kakao"));
    }
}
