//! HTTP API module for the Leave Engine.
//!
//! This module provides the REST API endpoints for reading leave balances
//! and monthly payroll ledgers.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BalanceQuery, LedgerQuery};
pub use response::{ApiError, ApiErrorResponse, HealthResponse};
pub use state::AppState;
