//! HTTP request handlers for the Leave Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::service::{get_leave_balance, get_monthly_ledger};

use super::request::{BalanceQuery, LedgerQuery};
use super::response::{ApiError, ApiErrorResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees/:id/leave-balance", get(leave_balance_handler))
        .route("/employees/:id/leave-ledger", get(leave_ledger_handler))
        .with_state(state)
}

/// The as-of date for a request: the caller's, or today (UTC).
fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn invalid_query(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string rejected"
    );
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiError::invalid_query(body_text)),
    )
        .into_response()
}

/// Logs the outcome of a query and converts it into a response.
fn finish<T: Serialize>(
    correlation_id: Uuid,
    employee_id: &str,
    start_time: Instant,
    operation: &'static str,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                operation,
                duration_us = start_time.elapsed().as_micros(),
                "Query completed successfully"
            );
            json_ok(body)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                operation,
                error = %err,
                "Query failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for GET /employees/:id/leave-balance.
///
/// Returns the employee's balance sheet as of `as_of`.
async fn leave_balance_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing leave balance request"
    );

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_query(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let as_of = as_of_or_today(query.as_of);
    let result = get_leave_balance(state.source(), &employee_id, as_of);
    finish(correlation_id, &employee_id, start_time, "leave_balance", result)
}

/// Handler for GET /employees/:id/leave-ledger.
///
/// Returns the employee's monthly paid/unpaid ledger.
async fn leave_ledger_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing leave ledger request"
    );

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_query(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let as_of = as_of_or_today(query.as_of);
    let result = get_monthly_ledger(state.source(), &employee_id, query.from, query.to, as_of);
    finish(correlation_id, &employee_id, start_time, "leave_ledger", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantConfig;
    use crate::models::{AccrualRule, Employee, LeaveBalanceSheet, LeaveType};
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let store = InMemoryStore::new()
            .with_tenant(
                TenantConfig::new(
                    "acme",
                    "Acme",
                    vec![AccrualRule {
                        tenant_id: "acme".to_string(),
                        leave_type: LeaveType::Annual,
                        monthly_credit: Decimal::new(167, 2),
                        max_annual_limit: None,
                        is_active: true,
                    }],
                )
                .unwrap(),
            )
            .with_employee(Employee {
                id: "emp_001".to_string(),
                tenant_id: "acme".to_string(),
                joining_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            });
        AppState::new(store)
    }

    async fn get(uri: &str) -> Response {
        create_router(create_test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_balance_returns_200() {
        let response = get("/employees/emp_001/leave-balance?as_of=2026-07-01").await;
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let sheet: LeaveBalanceSheet = serde_json::from_slice(&body).unwrap();
        assert_eq!(sheet.months_eligible, 7);
        assert_eq!(sheet.remaining(LeaveType::Annual), Decimal::new(1169, 2));
    }

    #[tokio::test]
    async fn test_malformed_as_of_returns_400() {
        let response = get("/employees/emp_001/leave-balance?as_of=July").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let response = get("/employees/emp_404/leave-ledger?as_of=2026-07-01").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
