//! Integration tests for the rank engine.
//!
//! This test suite covers:
//! - Step progression boundaries and multi-year scenarios over HTTP
//! - Prior-career conversion feeding the start step
//! - Partial internal recognition (dynamic path)
//! - Flat-salary "-" output and legacy record shapes
//! - Batch isolation of bad records
//! - The remote strategy against a live server, with retries and fallback

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use rank_engine::api::{AppState, create_router};
use rank_engine::calculation::{calculate_dynamic_rank, calculate_rank_info};
use rank_engine::client::{LocalStrategy, RankService, RankStrategy, RemoteStrategy};
use rank_engine::config::{ConfigLoader, RankRules, RemoteConfig};
use rank_engine::error::EngineError;
use rank_engine::models::{
    Assignment, BatchRankResult, Employee, Period, PriorCareerRecord, RankField, RankProfile,
    RankSource,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    create_router(AppState::new(config).expect("Failed to build state"))
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn stepped_employee(id: &str, entry: &str, start_rank: u32, first_upgrade: &str) -> Value {
    json!({
        "id": id,
        "entryDate": entry,
        "rank": {
            "startRank": start_rank,
            "firstUpgradeDate": first_upgrade,
            "salaryType": "stepped"
        }
    })
}

fn typed_employee(id: &str, entry: &str, start_rank: u32, first_upgrade: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: None,
        entry_date: date(entry),
        retirement_date: None,
        rank: RankProfile::stepped(start_rank, Some(date(first_upgrade))),
        career_details: vec![],
        assignments: vec![],
    }
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fast_retry_config(base_url: &str, max_retries: u32) -> RemoteConfig {
    RemoteConfig {
        timeout_secs: 2,
        max_retries,
        retry_backoff_ms: 1,
        ..RemoteConfig::new(base_url)
    }
}

// =============================================================================
// Step progression over HTTP
// =============================================================================

#[tokio::test]
async fn test_upgrade_on_anniversary_day() {
    let body = json!({
        "employee": stepped_employee("emp_001", "2023-03-01", 5, "2024-03-01"),
        "target_date": "2024-03-01"
    });
    let (status, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currentRank"], 6);
    assert_eq!(json["nextUpgradeDate"], "2025-03-01");
}

#[tokio::test]
async fn test_no_upgrade_day_before_anniversary() {
    let body = json!({
        "employee": stepped_employee("emp_001", "2023-03-01", 5, "2024-03-01"),
        "target_date": "2024-02-28"
    });
    let (status, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currentRank"], 5);
    assert_eq!(json["nextUpgradeDate"], "2024-03-01");
}

#[tokio::test]
async fn test_three_years_after_entry() {
    let body = json!({
        "employee": stepped_employee("emp_001", "2020-01-10", 1, "2021-01-10"),
        "target_date": "2023-01-10"
    });
    let (_, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["startRank"], 1);
    assert_eq!(json["firstUpgradeDate"], "2021-01-10");
    assert_eq!(json["currentRank"], 4);
    assert_eq!(json["adjusted"], false);
}

#[tokio::test]
async fn test_flat_salary_renders_dash() {
    let body = json!({
        "employee": {
            "id": "emp_flat",
            "employment": {"entryDate": "2019-05-01"},
            "rank": {"startRank": "-", "firstUpgradeDate": "-", "salaryType": "연봉제"}
        },
        "target_date": "2024-01-01"
    });
    let (status, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["startRank"], "-");
    assert_eq!(json["firstUpgradeDate"], "-");
    assert_eq!(json["currentRank"], "-");
    assert_eq!(json["nextUpgradeDate"], "-");
}

#[tokio::test]
async fn test_partial_internal_rate_adjusts_figures() {
    let body = json!({
        "employee": {
            "id": "emp_transfer",
            "entry_date": "2020-01-01",
            "rank": {"start_rank": 1, "first_upgrade_date": "2021-01-01"},
            "assignments": [
                {"id": "asg_001", "startDate": "2020-01-01", "endDate": "2022-01-01"},
                {"id": "asg_002", "startDate": "2022-01-01", "priorCareerRates": {"asg_001": 50}}
            ]
        },
        "target_date": "2024-01-01"
    });
    let (_, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(json["adjusted"], true);
    assert_eq!(json["lostDays"], 365);
    assert_eq!(json["adjustedEntryDate"], "2020-12-31");
    assert_eq!(json["firstUpgradeDate"], "2021-12-31");
    assert_eq!(json["currentRank"], 4);
}

#[tokio::test]
async fn test_overlapping_assignments_degrade_to_stored_figures() {
    let body = json!({
        "employee": {
            "id": "emp_overlap",
            "entryDate": "2020-01-01",
            "rank": {"startRank": 1, "firstUpgradeDate": "2021-01-01", "currentRank": 3, "nextUpgradeDate": "2023-01-01"},
            "assignments": [
                {"id": "asg_001", "startDate": "2020-01-01"},
                {"id": "asg_002", "startDate": "2022-01-01", "priorCareerRates": {"asg_001": 70}}
            ]
        },
        "target_date": "2024-01-01"
    });
    let (status, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["adjusted"], false);
    assert_eq!(json["currentRank"], 5);
    assert_eq!(json["nextUpgradeDate"], "2025-01-01");
}

#[tokio::test]
async fn test_overlapping_assignments_without_cache_use_stored_pair() {
    let body = json!({
        "employee": {
            "id": "emp_overlap",
            "entryDate": "2020-01-10",
            "rank": {"startRank": 1, "firstUpgradeDate": "2021-01-10"},
            "assignments": [
                {"id": "a1", "startDate": "2020-01-10"},
                {"id": "a2", "startDate": "2022-01-01", "priorCareerRates": {"a1": 50}}
            ]
        },
        "target_date": "2024-06-01"
    });
    let (status, json) = post(create_router_for_test(), "/rank", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["currentRank"], 5);
    assert_eq!(json["nextUpgradeDate"], "2025-01-10");
}

#[tokio::test]
async fn test_batch_isolates_bad_records() {
    let body = json!({
        "employees": [
            stepped_employee("emp_001", "2020-01-10", 1, "2021-01-10"),
            stepped_employee("emp_002", "2018-06-01", 3, "2019-06-01"),
            {"id": "emp_bad", "entryDate": "2020-13-01"},
            {"id": "emp_rank0", "entryDate": "2020-01-10", "rank": {"startRank": 0}}
        ],
        "target_date": "2023-01-10"
    });
    let (status, json) = post(create_router_for_test(), "/rank/batch", body).await;
    assert_eq!(status, StatusCode::OK);

    let batch: BatchRankResult = serde_json::from_value(json).unwrap();
    assert_eq!(batch.target_date, date("2023-01-10"));
    assert_eq!(batch.results.len(), 4);
    assert_eq!(batch.failure_count(), 2);
    assert_eq!(
        batch.results["emp_002"].output().unwrap().current_rank,
        RankField::Value(7)
    );
}

#[tokio::test]
async fn test_batch_invalid_target_date_returns_400() {
    let body = json!({ "employees": [], "target_date": "2023-02-29" });
    let (status, json) = post(create_router_for_test(), "/rank/batch", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "DATE_INVALID");
}

// =============================================================================
// Library scenarios
// =============================================================================

#[test]
fn test_two_years_at_half_rate_gives_start_rank_two() {
    let mut employee = typed_employee("emp_prior", "2022-03-01", 1, "2023-03-01");
    employee.career_details = vec![PriorCareerRecord::new(
        Period::new(2, 0, 0),
        Decimal::from(50),
    )];

    let info = calculate_dynamic_rank(&employee, date("2022-03-01"), &RankRules::default()).unwrap();
    assert_eq!(info.start_rank, 2);
    assert_eq!(info.first_upgrade_date, Some(date("2022-03-01")));
    assert_eq!(info.current_rank, 3);
}

#[test]
fn test_full_rate_assignments_take_stored_path() {
    let mut employee = typed_employee("emp_full", "2020-01-01", 1, "2021-01-01");
    employee.assignments = vec![
        Assignment::new("asg_001", date("2020-01-01"), Some(date("2022-01-01"))),
        Assignment::new("asg_002", date("2022-01-01"), None)
            .with_prior_rate("asg_001", Decimal::ONE_HUNDRED),
    ];

    let info = calculate_rank_info(&employee, date("2024-01-01"), &RankRules::default()).unwrap();
    assert_eq!(info.source, RankSource::Stored);
    assert_eq!(info.current_rank, 5);
}

// =============================================================================
// Remote strategy
// =============================================================================

#[tokio::test]
async fn test_remote_strategy_matches_local() {
    let base_url = spawn_server(create_router_for_test()).await;
    let remote = RemoteStrategy::new(fast_retry_config(&base_url, 0), RankRules::default()).unwrap();
    let local = LocalStrategy::default();

    let employees = vec![
        typed_employee("emp_001", "2020-01-10", 1, "2021-01-10"),
        typed_employee("emp_002", "2018-06-01", 3, "2019-06-01"),
    ];
    let target = date("2023-01-10");

    let from_remote = remote.fetch_batch(&employees, target).await.unwrap();
    let from_local = local.compute_batch(&employees, target).await.unwrap();
    assert_eq!(from_remote, from_local);
}

#[tokio::test]
async fn test_remote_unauthorized_is_not_degraded() {
    let router = Router::new().route("/rank/batch", routing::post(|| async { StatusCode::UNAUTHORIZED }));
    let base_url = spawn_server(router).await;
    let remote = RemoteStrategy::new(fast_retry_config(&base_url, 2), RankRules::default()).unwrap();

    let employees = vec![typed_employee("emp_001", "2020-01-10", 1, "2021-01-10")];
    let result = remote.compute_batch(&employees, date("2023-01-10")).await;
    assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
}

#[tokio::test]
async fn test_remote_server_errors_are_retried_then_degraded() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/rank/batch",
        routing::post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    );
    let base_url = spawn_server(router).await;
    let remote = RemoteStrategy::new(fast_retry_config(&base_url, 2), RankRules::default()).unwrap();

    let employees = vec![typed_employee("emp_001", "2020-01-10", 1, "2021-01-10")];
    let batch = remote.compute_batch(&employees, date("2023-01-10")).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(
        batch.results["emp_001"].output().unwrap().current_rank,
        RankField::Value(4)
    );
}

#[tokio::test]
async fn test_unreachable_remote_falls_back_to_local() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = RemoteStrategy::new(
        fast_retry_config(&format!("http://{}", addr), 1),
        RankRules::default(),
    )
    .unwrap();
    let employees = vec![typed_employee("emp_001", "2020-01-10", 1, "2021-01-10")];

    assert!(matches!(
        remote.fetch_batch(&employees, date("2023-01-10")).await,
        Err(EngineError::RemoteUnavailable { .. })
    ));

    let service = RankService::new(Arc::new(remote));
    let batch = service.rank_batch(&employees, date("2023-01-10")).await.unwrap();
    assert_eq!(batch.failure_count(), 0);
    assert_eq!(service.cache().len(), 1);
}
