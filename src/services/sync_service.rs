// src/services/sync_service.rs
// DOCUMENTATION: Kakao synchronization service
// PURPOSE: Orchestrate bulk gym import from the Kakao Local API

use crate::errors::GymsError;
use crate::services::kakao_client::{KakaoLocalClient, KakaoPlace};
use crate::services::location;
use crate::services::search_service::SearchService;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use std::time::Instant;

/// Synchronization statistics
/// DOCUMENTATION: Tracks results of a sync operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStats {
    /// Area that was synced
    pub area: String,
    /// Total number of API requests made
    pub api_requests: u32,
    /// Total places retrieved from the API
    pub places_retrieved: u32,
    /// Gyms successfully created in database
    pub gyms_created: u32,
    /// Gyms skipped (already exist)
    pub gyms_skipped: u32,
    /// Gyms that failed to insert
    pub gyms_failed: u32,
    /// Error messages encountered
    pub errors: Vec<String>,
    /// Total sync duration in seconds
    pub duration_seconds: u64,
    /// Timestamp when sync started
    pub started_at: String,
    /// Timestamp when sync completed
    pub completed_at: Option<String>,
}

impl SyncStats {
    /// Create new sync statistics tracker
    pub fn new(area: String) -> Self {
        Self {
            area,
            api_requests: 0,
            places_retrieved: 0,
            gyms_created: 0,
            gyms_skipped: 0,
            gyms_failed: 0,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Mark sync as completed
    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

/// Sync service for Kakao integration
/// DOCUMENTATION: Handles bulk synchronization of gyms from keyword searches
pub struct SyncService;

impl SyncService {
    /// Synchronize gyms for an area
    /// DOCUMENTATION: Main sync method - expands the area into keyword
    /// variants and imports every fitness result
    ///
    /// Process:
    /// 1. Expand the area into search keyword variants
    /// 2. For each keyword, query the Kakao keyword-search API
    /// 3. Deduplicate documents across keywords by place id
    /// 4. Upsert new gyms (existing rows stay unchanged, counted skipped)
    /// 5. Return statistics
    pub async fn sync_area(
        pool: &PgPool,
        kakao: &KakaoLocalClient,
        area: &str,
    ) -> Result<SyncStats, GymsError> {
        let start_time = Instant::now();
        let mut stats = SyncStats::new(area.to_string());

        if !kakao.has_credential() {
            return Err(GymsError::InvalidInput(
                "Kakao REST API key not configured".to_string(),
            ));
        }

        log::info!("Starting sync for area: {}", area);

        let keywords = location::search_keywords(area);
        log::info!("Expanded '{}' into {} keyword variants", area, keywords.len());

        let mut seen_place_ids: HashSet<String> = HashSet::new();

        for (idx, keyword) in keywords.iter().enumerate() {
            log::debug!(
                "Processing keyword {}/{}: {}",
                idx + 1,
                keywords.len(),
                keyword
            );

            match kakao.search_fitness(keyword, None, None).await {
                Ok(places) => {
                    stats.api_requests += 1;

                    // Keywords overlap heavily; only import each place once
                    let fresh: Vec<KakaoPlace> = places
                        .into_iter()
                        .filter(|p| seen_place_ids.insert(p.id.clone()))
                        .collect();

                    stats.places_retrieved += fresh.len() as u32;

                    log::info!(
                        "Keyword {}/{}: {} new documents",
                        idx + 1,
                        keywords.len(),
                        fresh.len()
                    );

                    let (created, skipped, failed) =
                        SearchService::store_live_results(pool, &fresh).await;
                    stats.gyms_created += created;
                    stats.gyms_skipped += skipped;
                    stats.gyms_failed += failed;
                }
                Err(e) => {
                    let error_msg = format!("API error for keyword '{}': {}", keyword, e);
                    log::error!("{}", error_msg);
                    stats.errors.push(error_msg);

                    if matches!(e, GymsError::RateLimitExceeded) {
                        log::error!("Rate limit exceeded, stopping sync");
                        break;
                    }
                }
            }

            // Small delay between requests to respect API rate limits
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }

        let duration = start_time.elapsed().as_secs();
        stats.complete(duration);

        log::info!(
            "Sync completed for {}: {} created, {} skipped, {} failed in {}s",
            area,
            stats.gyms_created,
            stats.gyms_skipped,
            stats.gyms_failed,
            duration
        );

        Ok(stats)
    }

    /// Synchronize gyms for multiple areas
    /// DOCUMENTATION: Batch sync operation
    pub async fn sync_areas(
        pool: &PgPool,
        kakao: &KakaoLocalClient,
        areas: &[String],
    ) -> Vec<SyncStats> {
        let mut all_stats = Vec::new();

        for area in areas {
            match Self::sync_area(pool, kakao, area).await {
                Ok(stats) => {
                    all_stats.push(stats);
                }
                Err(e) => {
                    log::error!("Failed to sync area {}: {}", area, e);

                    let mut stats = SyncStats::new(area.clone());
                    stats.errors.push(format!("Sync failed: {}", e));
                    stats.complete(0);
                    all_stats.push(stats);
                }
            }

            // Delay between areas to avoid overwhelming the API
            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
        }

        all_stats
    }

    /// Get sync summary across multiple area syncs
    /// DOCUMENTATION: Aggregates statistics from multiple sync operations
    pub fn aggregate_stats(stats_list: &[SyncStats]) -> SyncStats {
        let mut aggregated = SyncStats::new("Multiple Areas".to_string());

        for stats in stats_list {
            aggregated.api_requests += stats.api_requests;
            aggregated.places_retrieved += stats.places_retrieved;
            aggregated.gyms_created += stats.gyms_created;
            aggregated.gyms_skipped += stats.gyms_skipped;
            aggregated.gyms_failed += stats.gyms_failed;
            aggregated.duration_seconds += stats.duration_seconds;
            aggregated.errors.extend(stats.errors.clone());
        }

        aggregated.completed_at = Some(Utc::now().to_rfc3339());
        aggregated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_stats_creation() {
        let stats = SyncStats::new("서울시 광진구".to_string());

        assert_eq!(stats.area, "서울시 광진구");
        assert_eq!(stats.gyms_created, 0);
        assert_eq!(stats.gyms_skipped, 0);
        assert_eq!(stats.gyms_failed, 0);
        assert!(stats.completed_at.is_none());
    }

    #[test]
    fn test_sync_stats_complete() {
        let mut stats = SyncStats::new("서울시 성동구".to_string());
        stats.gyms_created = 12;
        stats.gyms_skipped = 3;

        stats.complete(45);

        assert_eq!(stats.duration_seconds, 45);
        assert!(stats.completed_at.is_some());
    }

    #[test]
    fn test_aggregate_stats() {
        let mut stats1 = SyncStats::new("서울시 광진구".to_string());
        stats1.api_requests = 5;
        stats1.places_retrieved = 40;
        stats1.gyms_created = 30;
        stats1.gyms_skipped = 8;
        stats1.gyms_failed = 2;
        stats1.errors.push("Error 1".to_string());
        stats1.complete(60);

        let mut stats2 = SyncStats::new("서울시 성동구".to_string());
        stats2.api_requests = 4;
        stats2.places_retrieved = 25;
        stats2.gyms_created = 20;
        stats2.gyms_skipped = 4;
        stats2.gyms_failed = 1;
        stats2.errors.push("Error 2".to_string());
        stats2.complete(50);

        let aggregated = SyncService::aggregate_stats(&[stats1, stats2]);

        assert_eq!(aggregated.api_requests, 9);
        assert_eq!(aggregated.places_retrieved, 65);
        assert_eq!(aggregated.gyms_created, 50);
        assert_eq!(aggregated.gyms_skipped, 12);
        assert_eq!(aggregated.gyms_failed, 3);
        assert_eq!(aggregated.duration_seconds, 110);
        assert_eq!(aggregated.errors.len(), 2);
    }
}
