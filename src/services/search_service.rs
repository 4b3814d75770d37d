// src/services/search_service.rs
// DOCUMENTATION: Location search aggregation over both sources
// PURPOSE: Merge registered (store) and live (Kakao) gym results into one list

use crate::db::{GymRepository, MachineRepository, ReviewRepository};
use crate::errors::GymsError;
use crate::models::{
    DisplayGym, Gym, GymDetailResponse, GymSearchQuery, GymSearchResponse, LivePlace,
    ProviderStatus,
};
use crate::services::kakao_client::{KakaoLocalClient, KakaoPlace};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

/// Default cap for the registered branch
const DEFAULT_REGISTERED_LIMIT: i64 = 20;

pub struct SearchService;

impl SearchService {
    /// Combined gym search
    /// DOCUMENTATION: Runs both lookups concurrently; each branch is
    /// failure-isolated. A store error empties the registered branch only;
    /// a provider problem serves the static fallback sample with a status
    /// the caller can distinguish from "no results".
    pub async fn search(
        pool: &PgPool,
        kakao: &KakaoLocalClient,
        default_area: &str,
        query: GymSearchQuery,
    ) -> GymSearchResponse {
        let area = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(default_area)
            .to_string();

        let limit = query.limit.unwrap_or(DEFAULT_REGISTERED_LIMIT);

        let (registered, (live, provider_status)) = tokio::join!(
            Self::registered_branch(pool, &area, limit),
            Self::live_branch(kakao, &area, query.lat, query.lng),
        );

        // Save-to-database mode: one independent fire-and-forget upsert per
        // live record; the response does not wait for them
        if query.save && provider_status == ProviderStatus::Live {
            for place in &live {
                let pool = pool.clone();
                let req = KakaoLocalClient::to_create_request(place);
                let name = place.place_name.clone();
                tokio::spawn(async move {
                    if let Err(e) = GymRepository::upsert_kakao_gym(&pool, &req).await {
                        log::warn!("Background upsert failed for {}: {}", name, e);
                    }
                });
            }
        }

        let has_coords = query.lat.is_some() && query.lng.is_some();
        let results = Self::merge_results(
            registered.iter().map(|g| g.to_response()).collect(),
            &live,
            has_coords,
        );

        let registered_count = registered.len();
        let live_count = results.len() - registered_count;

        log::info!(
            "Search '{}': {} registered + {} live ({:?})",
            area,
            registered_count,
            live_count,
            provider_status
        );

        GymSearchResponse {
            results,
            registered_count,
            live_count,
            provider_status,
            area,
        }
    }

    /// Registered branch: substring search over the store
    /// A read error degrades to an empty branch, never to a failed search
    async fn registered_branch(pool: &PgPool, area: &str, limit: i64) -> Vec<Gym> {
        match GymRepository::search_registered(pool, area, limit).await {
            Ok(gyms) => gyms,
            Err(e) => {
                log::warn!("Registered branch failed, returning empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Live branch: Kakao keyword search with fallback degradation
    async fn live_branch(
        kakao: &KakaoLocalClient,
        area: &str,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> (Vec<KakaoPlace>, ProviderStatus) {
        if !kakao.has_credential() {
            log::warn!("Kakao credential missing or invalid, serving fallback sample");
            return (
                KakaoLocalClient::fallback_gyms(),
                ProviderStatus::FallbackCredential,
            );
        }

        match kakao.search_fitness(area, lng, lat).await {
            Ok(places) => (places, ProviderStatus::Live),
            Err(e) => {
                log::warn!("Kakao search failed, serving fallback sample: {}", e);
                (
                    KakaoLocalClient::fallback_gyms(),
                    ProviderStatus::FallbackError,
                )
            }
        }
    }

    /// Merge both sources into the tagged display list
    /// DOCUMENTATION: Registered rows first (already rating-ordered by the
    /// store), then live documents not correlated to a registered row.
    /// Live entries sort by ascending distance when user coordinates were
    /// supplied, otherwise keep provider order.
    pub fn merge_results(
        registered: Vec<crate::models::GymResponse>,
        live: &[KakaoPlace],
        sort_live_by_distance: bool,
    ) -> Vec<DisplayGym> {
        let known_place_ids: HashSet<&str> = registered
            .iter()
            .filter_map(|g| g.kakao_place_id.as_deref())
            .collect();

        let mut live_entries: Vec<LivePlace> = live
            .iter()
            .filter(|p| !known_place_ids.contains(p.id.as_str()))
            .map(LivePlace::from_kakao)
            .collect();

        if sort_live_by_distance {
            // Documents without a parsed distance sort last
            live_entries.sort_by_key(|p| p.distance_m.unwrap_or(i32::MAX));
        }

        registered
            .into_iter()
            .map(DisplayGym::Registered)
            .chain(live_entries.into_iter().map(DisplayGym::Live))
            .collect()
    }

    /// Synchronously upsert a batch of live results
    /// DOCUMENTATION: Awaited variant of save mode - used by the sync
    /// service and wherever fully-synchronized state is required.
    /// One record failing never aborts the rest.
    /// Returns (created, skipped, failed)
    pub async fn store_live_results(
        pool: &PgPool,
        places: &[KakaoPlace],
    ) -> (u32, u32, u32) {
        let mut created = 0;
        let mut skipped = 0;
        let mut failed = 0;

        for place in places {
            let req = KakaoLocalClient::to_create_request(place);
            match GymRepository::upsert_kakao_gym(pool, &req).await {
                Ok((_, true)) => created += 1,
                Ok((_, false)) => skipped += 1,
                Err(e) => {
                    failed += 1;
                    log::warn!("Failed to store {}: {}", place.place_name, e);
                }
            }
        }

        (created, skipped, failed)
    }

    /// Get a gym with its machines and reviews
    /// DOCUMENTATION: Accepts a UUID or a Kakao place id as identifier
    pub async fn get_gym_detail(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<GymDetailResponse, GymsError> {
        let gym = if let Ok(uuid) = Uuid::parse_str(identifier) {
            GymRepository::get_by_id(pool, uuid).await?
        } else {
            GymRepository::get_by_kakao_place_id(pool, identifier).await?
        };

        let machines = MachineRepository::get_machines_by_gym(pool, &gym.id).await?;
        let reviews = ReviewRepository::get_reviews_by_gym(pool, &gym.id).await?;

        Ok(GymDetailResponse {
            gym: gym.to_response(),
            machines: machines.iter().map(|m| m.to_response()).collect(),
            reviews: reviews.iter().map(|r| r.to_response()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GymResponse;
    use chrono::Utc;

    fn registered_gym(name: &str, kakao_place_id: Option<&str>) -> GymResponse {
        GymResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: "서울시 광진구 구의동".to_string(),
            city: Some("서울시".to_string()),
            district: Some("광진구".to_string()),
            dong: Some("구의동".to_string()),
            latitude: Some(37.54),
            longitude: Some(127.08),
            rating: 4.5,
            review_count: 10,
            thumbs_up: 3,
            thumbs_down: 0,
            kakao_place_id: kakao_place_id.map(|s| s.to_string()),
            phone: None,
            place_url: None,
            data_source: Some("kakao".to_string()),
            daily_price: Some(15000),
            regular_holidays: None,
            power_rack_count: Some(4),
            smith_rack_count: Some(2),
            dumbbell_max_weight: None,
            machine_brands: None,
            amenities: None,
            is_verified: Some(false),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn live_place(id: &str, name: &str, distance: &str) -> KakaoPlace {
        KakaoPlace {
            id: id.to_string(),
            place_name: name.to_string(),
            category_name: "헬스장".to_string(),
            category_group_code: "CT1".to_string(),
            phone: String::new(),
            address_name: "서울시 광진구 자양동 1-2".to_string(),
            road_address_name: String::new(),
            x: "127.07".to_string(),
            y: "37.53".to_string(),
            place_url: String::new(),
            distance: distance.to_string(),
        }
    }

    #[test]
    fn test_correlated_place_appears_once_as_registered() {
        let registered = vec![registered_gym("파워존 헬스클럽", Some("k-100"))];
        let live = vec![
            live_place("k-100", "파워존 헬스클럽", "300"),
            live_place("k-200", "아이언 피트니스", "500"),
        ];

        let merged = SearchService::merge_results(registered, &live, false);

        assert_eq!(merged.len(), 2);
        assert!(matches!(merged[0], DisplayGym::Registered(_)));
        assert!(matches!(merged[1], DisplayGym::Live(_)));
        // The correlated id shows up exactly once
        let matches: Vec<_> = merged
            .iter()
            .filter(|d| d.correlation_key() == Some("k-100"))
            .collect();
        assert_eq!(matches.len(), 1);
        assert!(matches!(matches[0], DisplayGym::Registered(_)));
    }

    #[test]
    fn test_registered_rows_come_first() {
        let registered = vec![
            registered_gym("스트롱 바디 센터", None),
            registered_gym("헬스 마스터", Some("k-5")),
        ];
        let live = vec![live_place("k-9", "타임짐 성수점", "200")];

        let merged = SearchService::merge_results(registered, &live, false);

        assert_eq!(merged.len(), 3);
        assert!(matches!(merged[0], DisplayGym::Registered(_)));
        assert!(matches!(merged[1], DisplayGym::Registered(_)));
        assert!(matches!(merged[2], DisplayGym::Live(_)));
    }

    #[test]
    fn test_live_sorted_by_distance_with_coords() {
        let live = vec![
            live_place("a", "강남 헬스클럽", "900"),
            live_place("b", "역삼 피트니스", "150"),
            live_place("c", "선릉 짐", "400"),
        ];

        let merged = SearchService::merge_results(Vec::new(), &live, true);

        let names: Vec<&str> = merged.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["역삼 피트니스", "선릉 짐", "강남 헬스클럽"]);
    }

    #[test]
    fn test_live_keeps_provider_order_without_coords() {
        let live = vec![
            live_place("a", "강남 헬스클럽", "900"),
            live_place("b", "역삼 피트니스", "150"),
        ];

        let merged = SearchService::merge_results(Vec::new(), &live, false);

        let names: Vec<&str> = merged.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["강남 헬스클럽", "역삼 피트니스"]);
    }

    #[test]
    fn test_missing_distance_sorts_last() {
        let live = vec![
            live_place("a", "강남 헬스클럽", ""),
            live_place("b", "역삼 피트니스", "150"),
        ];

        let merged = SearchService::merge_results(Vec::new(), &live, true);

        let names: Vec<&str> = merged.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["역삼 피트니스", "강남 헬스클럽"]);
    }
}
