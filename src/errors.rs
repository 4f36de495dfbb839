use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the vyride admin core
#[derive(Debug, Error)]
pub enum DashboardError {
    // Validation errors
    #[error("Validation failed: {} errors", .0.len())]
    ValidationFailed(Vec<ValidationError>),

    #[error("A reason is required to {0} a driver")]
    MissingReason(String),

    // Lifecycle errors
    #[error("Cannot move {entity} {id} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        from: String,
        to: String,
    },

    // Lookup errors
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Passenger request not found: {0}")]
    RequestNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    // Collaborator and setup errors
    #[error("Data source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Convenience type alias for Results
pub type DashboardResult<T> = Result<T, DashboardError>;

// Helper functions for creating common errors
impl DashboardError {
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        DashboardError::ValidationFailed(vec![ValidationError::new(field, message)])
    }

    pub fn invalid_transition(
        entity: &'static str,
        id: impl Into<String>,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        DashboardError::InvalidTransition {
            entity,
            id: id.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn driver_not_found(driver_id: impl Into<String>) -> Self {
        DashboardError::DriverNotFound(driver_id.into())
    }

    pub fn report_not_found(report_id: impl Into<String>) -> Self {
        DashboardError::ReportNotFound(report_id.into())
    }

    pub fn request_not_found(request_id: impl Into<String>) -> Self {
        DashboardError::RequestNotFound(request_id.into())
    }

    /// Field-level messages keyed by field name, for re-rendering a form.
    pub fn field_errors(&self) -> Vec<(&str, &str)> {
        match self {
            DashboardError::ValidationFailed(errors) => errors
                .iter()
                .map(|e| (e.field.as_str(), e.message.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }
}
