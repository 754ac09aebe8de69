//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for generating, listing,
//! previewing, and managing payroll records.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DeleteSlipQuery, GenerateRequest, ListQuery, PreviewQuery, StatusUpdateRequest};
pub use response::{ApiError, ApiErrorResponse, DeletedSlip};
pub use state::AppState;
