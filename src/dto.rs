use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::package::{
    CreatePackage, Event, EventStatus, Package, RecordEvent, TrackingError,
};

// ============================================================================
// Boundary Shapes
// ============================================================================
//
// Everything that crosses the HTTP edge. Responses form a strict tree:
// an event names its package by tracking code and never embeds it.
//
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub event_timestamp: NaiveDateTime,
    pub status: EventStatus,
    pub description: Option<String>,
    pub tracking_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    pub tracking_code: String,
    pub client_name: String,
    pub delivery_address: String,
    pub events: Vec<EventResponse>,
}

impl From<CreatePackageRequest> for CreatePackage {
    fn from(request: CreatePackageRequest) -> Self {
        Self {
            tracking_code: request.tracking_code.unwrap_or_default(),
            client_name: request.client_name.unwrap_or_default(),
            delivery_address: request.delivery_address.unwrap_or_default(),
        }
    }
}

impl CreateEventRequest {
    pub fn into_command(self) -> Result<RecordEvent, TrackingError> {
        let status = self
            .status
            .ok_or_else(|| TrackingError::Validation("Status cannot be null".to_string()))?;

        match self.event_timestamp.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {}
            _ => {
                return Err(TrackingError::Validation(
                    "Event timestamp cannot be blank".to_string(),
                ))
            }
        }

        Ok(RecordEvent {
            status,
            description: self.description,
            timestamp: self.event_timestamp,
        })
    }
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            event_timestamp: event.timestamp,
            status: event.status,
            description: event.description.clone(),
            tracking_code: event.tracking_code.as_str().to_string(),
        }
    }
}

impl From<&Package> for PackageResponse {
    fn from(package: &Package) -> Self {
        Self {
            tracking_code: package.tracking_code.as_str().to_string(),
            client_name: package.client_name.clone(),
            delivery_address: package.delivery_address.clone(),
            events: package.events.iter().map(EventResponse::from).collect(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
