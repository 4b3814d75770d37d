// src/bin/populate.rs
// Console client that drives the admin sync endpoints to seed the database
// with gyms for the Seoul districts.

use anyhow::{Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors for the terminal ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Districts seeded by default. Pass area names as arguments to override.
const DEFAULT_DISTRICTS: [&str; 10] = [
    "서울시 광진구",
    "서울시 강남구",
    "서울시 서초구",
    "서울시 성동구",
    "서울시 마포구",
    "서울시 송파구",
    "서울시 영등포구",
    "서울시 용산구",
    "서울시 동작구",
    "서울시 노원구",
];

/// Mirror of the service's SyncStats response
#[derive(Deserialize, Debug, Default)]
struct SyncResponse {
    area: String,
    #[serde(default)]
    api_requests: u32,
    #[serde(default)]
    places_retrieved: u32,
    #[serde(default)]
    gyms_created: u32,
    #[serde(default)]
    gyms_skipped: u32,
    #[serde(default)]
    gyms_failed: u32,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    duration_seconds: u64,
}

#[derive(Debug)]
struct AreaResult {
    area: String,
    success: bool,
    gyms_created: u32,
    gyms_skipped: u32,
    api_requests: u32,
    duration_secs: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url =
        env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8003".to_string());
    let admin_token = env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin-token-dev".to_string());

    let args: Vec<String> = env::args().skip(1).collect();
    let areas: Vec<String> = if args.is_empty() {
        DEFAULT_DISTRICTS.iter().map(|s| s.to_string()).collect()
    } else {
        args
    };

    println!(
        "{}{}=== gymseek populate ==={}",
        BOLD, CYAN, RESET
    );
    println!("Target: {}", base_url);
    println!("Areas:  {}\n", areas.len());

    let client = Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .context("failed to build HTTP client")?;

    let mut results: Vec<AreaResult> = Vec::new();

    for (idx, area) in areas.iter().enumerate() {
        println!(
            "{}[{}/{}]{} Syncing {}{}{} ...",
            BOLD,
            idx + 1,
            areas.len(),
            RESET,
            CYAN,
            area,
            RESET
        );

        let started = Instant::now();
        let url = format!("{}/admin/sync/{}", base_url, area);

        let response = client
            .post(&url)
            .header("X-Admin-Token", &admin_token)
            .send()
            .await;

        let duration_secs = started.elapsed().as_secs_f64();

        match response {
            Ok(resp) if resp.status().is_success() => {
                let stats: SyncResponse = resp
                    .json()
                    .await
                    .with_context(|| format!("invalid sync response for {}", area))?;

                println!(
                    "    {}ok{} - {} created, {} skipped, {} failed ({} API calls, {}s)",
                    GREEN,
                    RESET,
                    stats.gyms_created,
                    stats.gyms_skipped,
                    stats.gyms_failed,
                    stats.api_requests,
                    stats.duration_seconds
                );
                for err in &stats.errors {
                    println!("    {}warn{} {}", YELLOW, RESET, err);
                }

                results.push(AreaResult {
                    area: stats.area,
                    success: stats.gyms_failed == 0,
                    gyms_created: stats.gyms_created,
                    gyms_skipped: stats.gyms_skipped,
                    api_requests: stats.api_requests,
                    duration_secs,
                });
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                println!("    {}error{} HTTP {}: {}", RED, RESET, status, body);
                results.push(AreaResult {
                    area: area.clone(),
                    success: false,
                    gyms_created: 0,
                    gyms_skipped: 0,
                    api_requests: 0,
                    duration_secs,
                });
            }
            Err(e) => {
                println!("    {}error{} request failed: {}", RED, RESET, e);
                results.push(AreaResult {
                    area: area.clone(),
                    success: false,
                    gyms_created: 0,
                    gyms_skipped: 0,
                    api_requests: 0,
                    duration_secs,
                });
            }
        }
    }

    // --- Summary ---
    let total_created: u32 = results.iter().map(|r| r.gyms_created).sum();
    let total_skipped: u32 = results.iter().map(|r| r.gyms_skipped).sum();
    let total_requests: u32 = results.iter().map(|r| r.api_requests).sum();
    let failures = results.iter().filter(|r| !r.success).count();

    println!("\n{}{}=== Summary ==={}", BOLD, CYAN, RESET);
    for r in &results {
        let marker = if r.success {
            format!("{}+{}", GREEN, RESET)
        } else {
            format!("{}x{}", RED, RESET)
        };
        println!(
            "  {} {:<16} created={:<4} skipped={:<4} ({:.1}s)",
            marker, r.area, r.gyms_created, r.gyms_skipped, r.duration_secs
        );
    }
    println!(
        "\n  {} gyms created, {} skipped, {} API requests",
        total_created, total_skipped, total_requests
    );

    if failures > 0 {
        println!("  {}{} area(s) had failures{}", RED, failures, RESET);
        process::exit(1);
    }

    println!("  {}all areas synced{}", GREEN, RESET);
    Ok(())
}
