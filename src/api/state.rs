//! Application state for the Leave Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::store::LeaveDataSource;

/// Shared application state.
///
/// Holds the read-only data source every query is computed from.
#[derive(Clone)]
pub struct AppState {
    /// Where rules, employees and approved leave are read from.
    source: Arc<dyn LeaveDataSource>,
}

impl AppState {
    /// Creates a new application state over a data source.
    pub fn new(source: impl LeaveDataSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Creates a state sharing an existing data source.
    pub fn from_shared(source: Arc<dyn LeaveDataSource>) -> Self {
        Self { source }
    }

    /// Returns the data source.
    pub fn source(&self) -> &dyn LeaveDataSource {
        self.source.as_ref()
    }
}
