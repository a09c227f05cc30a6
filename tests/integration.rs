//! Integration tests for the Leave Engine HTTP API.
//!
//! This test suite covers:
//! - Balance computation against the demo data set
//! - Cascading overflow into annual leave and leave without pay
//! - Monthly ledger rows, defaults and caps
//! - Error mapping (404 / 400)

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tower::ServiceExt;

use leave_engine::api::{AppState, create_router};
use leave_engine::config::{ConfigLoader, TenantConfig};
use leave_engine::models::{AccrualRule, Employee, LeaveType};
use leave_engine::store::InMemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

const DEMO_DIR: &str = "./data/demo";

fn demo_router() -> Router {
    let config = ConfigLoader::load(DEMO_DIR).expect("Failed to load config");
    let default_tenant = config.server().default_tenant.clone();
    let store = InMemoryStore::load(DEMO_DIR, config.into_accrual(), default_tenant.as_deref())
        .expect("Failed to load demo store");
    create_router(AppState::new(store))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rule(leave_type: LeaveType, credit: &str) -> AccrualRule {
    AccrualRule {
        tenant_id: "acme".to_string(),
        leave_type,
        monthly_credit: decimal(credit),
        max_annual_limit: None,
        is_active: true,
    }
}

/// A single acme employee who joined on 2026-01-01.
fn new_joiner_store(rules: Vec<AccrualRule>) -> InMemoryStore {
    InMemoryStore::new()
        .with_tenant(TenantConfig::new("acme", "Acme", rules).unwrap())
        .with_employee(Employee {
            id: "emp_001".to_string(),
            tenant_id: "acme".to_string(),
            joining_date: Some(date(2026, 1, 1)),
        })
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn balance_field(result: &Value, key: &str, field: &str) -> Decimal {
    let raw = result["balances"][key][field]
        .as_str()
        .unwrap_or_else(|| panic!("missing balances.{}.{} in {}", key, field, result));
    decimal(raw)
}

fn row<'a>(ledger: &'a Value, year_month: &str) -> &'a Value {
    ledger["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["year_month"] == year_month)
        .unwrap_or_else(|| panic!("no row for {}", year_month))
}

fn days(row: &Value) -> (u64, u64) {
    (
        row["paid_days"].as_u64().unwrap(),
        row["unpaid_days"].as_u64().unwrap(),
    )
}

fn has_warning(result: &Value, code: &str) -> bool {
    result["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w["code"] == code)
}

// =============================================================================
// Balances
// =============================================================================

#[tokio::test]
async fn test_new_joiner_accrues_seven_months() {
    let (status, result) =
        get_json(demo_router(), "/employees/emp_001/leave-balance?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["months_eligible"], 7);
    assert_eq!(result["year"], 2026);
    assert_eq!(balance_field(&result, "annual", "total"), decimal("11.69"));
}

#[tokio::test]
async fn test_sick_overflow_borrows_from_annual() {
    let (_, result) =
        get_json(demo_router(), "/employees/emp_001/leave-balance?as_of=2026-07-01").await;

    assert_eq!(balance_field(&result, "sick", "total"), decimal("3.5"));
    assert_eq!(balance_field(&result, "sick", "used"), decimal("5"));
    assert_eq!(balance_field(&result, "sick", "remaining"), Decimal::ZERO);
    assert_eq!(balance_field(&result, "annual", "used"), decimal("1.5"));
    assert_eq!(balance_field(&result, "annual", "remaining"), decimal("10.19"));
    assert!(result["balances"].get("lwp").is_none());
}

#[tokio::test]
async fn test_pending_and_rejected_requests_do_not_count() {
    let (_, result) =
        get_json(demo_router(), "/employees/emp_001/leave-balance?as_of=2026-07-01").await;

    // req_002 (annual, pending) and req_003 (casual, rejected) are ignored.
    assert_eq!(balance_field(&result, "casual", "used"), Decimal::ZERO);
    assert_eq!(balance_field(&result, "casual", "total"), decimal("3.5"));
}

#[tokio::test]
async fn test_inactive_rule_is_not_reported() {
    let (_, result) =
        get_json(demo_router(), "/employees/emp_001/leave-balance?as_of=2026-07-01").await;
    assert!(result["balances"].get("maternity").is_none());
}

#[tokio::test]
async fn test_unpaid_leave_goes_to_lwp() {
    let (_, result) =
        get_json(demo_router(), "/employees/emp_002/leave-balance?as_of=2026-07-01").await;

    // The 2025 request falls outside the year; only the 11 January/February days count.
    assert_eq!(balance_field(&result, "annual", "used"), decimal("11"));
    assert_eq!(balance_field(&result, "annual", "remaining"), decimal("0.69"));
    assert_eq!(balance_field(&result, "lwp", "used"), decimal("2"));
    assert_eq!(balance_field(&result, "lwp", "total"), Decimal::ZERO);
}

#[tokio::test]
async fn test_unconfigured_type_goes_to_lwp() {
    let (_, result) =
        get_json(demo_router(), "/employees/emp_101/leave-balance?as_of=2026-07-01").await;

    assert_eq!(balance_field(&result, "annual", "total"), decimal("10.5"));
    assert_eq!(balance_field(&result, "compensatory", "total"), decimal("1.75"));
    assert_eq!(balance_field(&result, "lwp", "used"), decimal("5"));
    assert!(result["balances"].get("paternity").is_none());
}

#[tokio::test]
async fn test_default_tenant_applies_to_employee_without_tenant() {
    let (status, result) =
        get_json(demo_router(), "/employees/emp_005/leave-balance?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::OK);
    // Joined 2026-03-25: March through July.
    assert_eq!(result["months_eligible"], 5);
    assert_eq!(balance_field(&result, "annual", "total"), decimal("8.35"));
}

#[tokio::test]
async fn test_annual_overuse_is_clamped_with_warning() {
    let store = new_joiner_store(vec![rule(LeaveType::Annual, "1.67")]).with_approved_leave(
        "emp_001",
        LeaveType::Annual,
        date(2026, 1, 12),
        date(2026, 1, 16),
    );
    let router = create_router(AppState::new(store));

    let (status, result) =
        get_json(router, "/employees/emp_001/leave-balance?as_of=2026-02-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance_field(&result, "annual", "total"), decimal("3.34"));
    assert_eq!(balance_field(&result, "annual", "used"), decimal("5"));
    assert_eq!(balance_field(&result, "annual", "remaining"), Decimal::ZERO);
    assert!(result["balances"].get("lwp").is_none());
    assert!(has_warning(&result, "ANNUAL_OVERUSE_CLAMPED"));
}

#[tokio::test]
async fn test_overflow_beyond_annual_becomes_lwp() {
    let store = new_joiner_store(vec![
        rule(LeaveType::Annual, "1"),
        rule(LeaveType::Sick, "0.5"),
    ])
    .with_approved_leave("emp_001", LeaveType::Sick, date(2026, 1, 5), date(2026, 1, 9));
    let router = create_router(AppState::new(store));

    let (_, result) = get_json(router, "/employees/emp_001/leave-balance?as_of=2026-02-01").await;

    // Sick 1 of 5 days, annual absorbs 2, the remaining 2 are unpaid.
    assert_eq!(balance_field(&result, "annual", "used"), decimal("2"));
    assert_eq!(balance_field(&result, "annual", "remaining"), Decimal::ZERO);
    assert_eq!(balance_field(&result, "lwp", "used"), decimal("2"));
}

#[tokio::test]
async fn test_balance_audit_trace_records_steps() {
    let (_, result) =
        get_json(demo_router(), "/employees/emp_001/leave-balance?as_of=2026-07-01").await;

    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps.iter().map(|s| s["rule_id"].as_str().unwrap()).collect();
    assert_eq!(rule_ids[0], "monthly_accrual");
    assert_eq!(rule_ids[1], "consumption_aggregation");
    assert!(rule_ids.contains(&"cascade_to_annual"));
    assert_eq!(*rule_ids.last().unwrap(), "lwp_classification");
}

// =============================================================================
// Ledger
// =============================================================================

#[tokio::test]
async fn test_ledger_rows_zero_filled_from_january() {
    let (status, ledger) =
        get_json(demo_router(), "/employees/emp_001/leave-ledger?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::OK);
    let rows = ledger["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["year_month"], "2026-01");
    assert_eq!(rows[6]["year_month"], "2026-07");
    assert_eq!(days(row(&ledger, "2026-03")), (5, 0));
    assert_eq!(days(row(&ledger, "2026-04")), (0, 0));
    assert_eq!(ledger["totals"]["paid_days"], 5);
    assert_eq!(ledger["from"], "2026-01-01");
    assert_eq!(ledger["to"], "2026-07-01");
}

#[tokio::test]
async fn test_ledger_to_is_capped_at_as_of_month() {
    let (_, ledger) = get_json(
        demo_router(),
        "/employees/emp_001/leave-ledger?from=2026-02-01&to=2026-12-01&as_of=2026-04-10",
    )
    .await;

    let months: Vec<&str> = ledger["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["year_month"].as_str().unwrap())
        .collect();
    assert_eq!(months, vec!["2026-02", "2026-03", "2026-04"]);
}

#[tokio::test]
async fn test_ledger_split_across_month_boundary() {
    let store = new_joiner_store(vec![rule(LeaveType::Annual, "1.67")]).with_approved_leave(
        "emp_001",
        LeaveType::Annual,
        date(2026, 1, 28),
        date(2026, 2, 7),
    );
    let router = create_router(AppState::new(store));

    let (_, ledger) = get_json(router, "/employees/emp_001/leave-ledger?as_of=2026-12-01").await;

    let (jan_paid, jan_unpaid) = days(row(&ledger, "2026-01"));
    let (feb_paid, feb_unpaid) = days(row(&ledger, "2026-02"));
    assert_eq!(jan_paid + jan_unpaid + feb_paid + feb_unpaid, 11);
    // 4 of the 11 days fall in January, 7 in February.
    assert!((jan_paid + jan_unpaid).abs_diff(4) <= 1);
    assert!((feb_paid + feb_unpaid).abs_diff(7) <= 1);
}

#[tokio::test]
async fn test_ledger_unpaid_type_is_unpaid() {
    let (_, ledger) =
        get_json(demo_router(), "/employees/emp_002/leave-ledger?as_of=2026-07-01").await;

    assert_eq!(days(row(&ledger, "2026-04")), (0, 2));
}

#[tokio::test]
async fn test_ledger_uses_post_consumption_snapshot() {
    // emp_002's own January/February annual leave has already consumed most
    // of the 11.69 accrued, leaving 0.69 remaining. Annual leave is checked
    // against remaining annual twice, so 1.38 of the 11 days are paid.
    let (_, ledger) =
        get_json(demo_router(), "/employees/emp_002/leave-ledger?as_of=2026-07-01").await;

    assert_eq!(days(row(&ledger, "2026-01")), (1, 3));
    assert_eq!(days(row(&ledger, "2026-02")), (1, 6));
    assert_eq!(ledger["totals"]["paid_days"], 2);
    assert_eq!(ledger["totals"]["unpaid_days"], 11);
    assert!(has_warning(&ledger, "ANNUAL_BALANCE_DOUBLE_COUNTED"));
}

#[tokio::test]
async fn test_ledger_unconfigured_type_is_unpaid() {
    let (_, ledger) =
        get_json(demo_router(), "/employees/emp_101/leave-ledger?as_of=2026-07-01").await;

    assert_eq!(days(row(&ledger, "2026-02")), (0, 5));
    // The cancelled sick request in May is not part of the ledger.
    assert_eq!(days(row(&ledger, "2026-05")), (0, 0));
}

#[tokio::test]
async fn test_ledger_shared_snapshot_warning() {
    let store = new_joiner_store(vec![rule(LeaveType::Annual, "1.67")])
        .with_approved_leave("emp_001", LeaveType::Annual, date(2026, 3, 2), date(2026, 3, 3))
        .with_approved_leave("emp_001", LeaveType::Annual, date(2026, 4, 6), date(2026, 4, 7));
    let router = create_router(AppState::new(store));

    let (_, ledger) = get_json(router, "/employees/emp_001/leave-ledger?as_of=2026-07-01").await;

    assert!(has_warning(&ledger, "SHARED_BALANCE_SNAPSHOT"));
    assert_eq!(ledger["totals"]["paid_days"], 4);
}

#[tokio::test]
async fn test_ledger_is_idempotent() {
    let uri = "/employees/emp_002/leave-ledger?as_of=2026-07-01";
    let (_, first) = get_json(demo_router(), uri).await;
    let (_, second) = get_json(demo_router(), uri).await;

    assert_eq!(first["rows"], second["rows"]);
    assert_eq!(first["totals"], second["totals"]);
}

#[tokio::test]
async fn test_ledger_window_empty_after_cap() {
    let (status, ledger) = get_json(
        demo_router(),
        "/employees/emp_001/leave-ledger?from=2026-09-01&as_of=2026-07-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(ledger["rows"].as_array().unwrap().is_empty());
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_unknown_employee_returns_404() {
    let (status, error) =
        get_json(demo_router(), "/employees/emp_404/leave-balance?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn test_missing_joining_date_returns_404() {
    let (status, error) =
        get_json(demo_router(), "/employees/emp_003/leave-balance?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "JOINING_DATE_MISSING");
}

#[tokio::test]
async fn test_missing_tenant_rules_returns_404() {
    let (status, error) =
        get_json(demo_router(), "/employees/emp_004/leave-ledger?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "ACCRUAL_CONFIG_MISSING");
}

#[tokio::test]
async fn test_reversed_range_returns_400() {
    let (status, error) = get_json(
        demo_router(),
        "/employees/emp_001/leave-ledger?from=2026-05-01&to=2026-02-01&as_of=2026-07-01",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_reversed_leave_interval_returns_400() {
    let store = new_joiner_store(vec![rule(LeaveType::Annual, "1.67")]).with_approved_leave(
        "emp_001",
        LeaveType::Sick,
        date(2026, 3, 10),
        date(2026, 3, 8),
    );
    let router = create_router(AppState::new(store));

    let (status, error) =
        get_json(router, "/employees/emp_001/leave-balance?as_of=2026-07-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_LEAVE_INTERVAL");
}

#[tokio::test]
async fn test_malformed_date_returns_invalid_query() {
    let (status, error) =
        get_json(demo_router(), "/employees/emp_001/leave-ledger?from=01-02-2026").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_QUERY");
}
