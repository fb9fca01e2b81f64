use super::entities::NewPackage;
use super::errors::TrackingError;
use super::value_objects::{EventStatus, TrackingCode};

// ============================================================================
// Package Commands - Represent user intent
// ============================================================================

pub const TRACKING_CODE_MAX_CHARS: usize = 50;
pub const CLIENT_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct CreatePackage {
    pub tracking_code: String,
    pub client_name: String,
    pub delivery_address: String,
}

/// Append a status event to an existing package
#[derive(Debug, Clone)]
pub struct RecordEvent {
    pub status: EventStatus,
    pub description: Option<String>,
    pub timestamp: Option<String>,
}

impl CreatePackage {
    /// Check field presence and bounds; the first violation wins
    pub fn validate(self) -> Result<NewPackage, TrackingError> {
        require_bounded(&self.tracking_code, "Tracking code", Some(TRACKING_CODE_MAX_CHARS))?;
        require_bounded(&self.client_name, "Client name", Some(CLIENT_NAME_MAX_CHARS))?;
        require_bounded(&self.delivery_address, "Delivery address", None)?;

        Ok(NewPackage {
            tracking_code: TrackingCode::new(self.tracking_code),
            client_name: self.client_name,
            delivery_address: self.delivery_address,
        })
    }
}

fn require_bounded(value: &str, field: &str, max_chars: Option<usize>) -> Result<(), TrackingError> {
    if value.trim().is_empty() {
        return Err(TrackingError::Validation(format!("{} cannot be blank", field)));
    }

    if let Some(max) = max_chars {
        if value.chars().count() > max {
            return Err(TrackingError::Validation(format!(
                "{} must be between 1 and {} characters",
                field, max
            )));
        }
    }

    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
