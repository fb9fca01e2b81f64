use super::value_objects::TrackingCode;

// ============================================================================
// Package Tracking Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// Missing or malformed input, rejected before touching the store
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl TrackingError {
    pub fn package_not_found(tracking_code: &TrackingCode) -> Self {
        Self::NotFound(format!(
            "Package with tracking code '{}' not found",
            tracking_code
        ))
    }

    pub fn event_not_found(event_id: i64) -> Self {
        Self::NotFound(format!("Event with id '{}' not found", event_id))
    }

    pub fn duplicate_package(tracking_code: &TrackingCode) -> Self {
        Self::Conflict(format!(
            "Package with tracking code '{}' already exists",
            tracking_code
        ))
    }

    /// Category reported in error bodies and metrics
    pub fn category(&self) -> &'static str {
        match self {
            TrackingError::Validation(_) => "Validation Error",
            TrackingError::Conflict(_) => "Business Rule Violation",
            TrackingError::NotFound(_) => "Resource Not Found",
            TrackingError::Unexpected(_) => "Internal Server Error",
        }
    }
}
