//! Application state for the payroll API.

use std::sync::Arc;

use crate::payroll::PayrollService;

/// Shared application state.
///
/// Holds the payroll service every handler delegates to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state around a payroll service.
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
