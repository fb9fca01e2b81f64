use chrono::{NaiveDateTime, SubsecRound, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::TrackingError;

// ============================================================================
// Package Value Objects
// ============================================================================

/// Human-assigned identifier of a package; primary key of the package table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCode(String);

impl TrackingCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status carried by a tracking event.
///
/// Any status may follow any other; the state of a package is read from
/// its most recent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Created,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
    Undelivered,
    Returned,
}

impl EventStatus {
    pub const ALL: [EventStatus; 7] = [
        EventStatus::Created,
        EventStatus::Shipped,
        EventStatus::InTransit,
        EventStatus::OutForDelivery,
        EventStatus::Delivered,
        EventStatus::Undelivered,
        EventStatus::Returned,
    ];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Created => "CREATED",
            EventStatus::Shipped => "SHIPPED",
            EventStatus::InTransit => "IN_TRANSIT",
            EventStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            EventStatus::Delivered => "DELIVERED",
            EventStatus::Undelivered => "UNDELIVERED",
            EventStatus::Returned => "RETURNED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TrackingError::Validation(format!("Unknown event status: {}", s)))
    }
}

// ============================================================================
// Event Timestamps
// ============================================================================

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a client supplied ISO-8601 local date-time.
///
/// A trailing `Z` is dropped and fractional seconds are truncated, so
/// `2025-11-05T14:33:00.999Z` becomes `2025-11-05T14:33:00`. Every field must
/// be zero-padded and leap seconds are rejected.
pub fn parse_event_timestamp(raw: &str) -> Result<NaiveDateTime, TrackingError> {
    let invalid = || {
        TrackingError::Validation(format!(
            "Invalid event timestamp '{}': expected an ISO-8601 date-time such as 2025-11-05T14:33:00",
            raw
        ))
    };

    let trimmed = raw.trim();
    let without_zone = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let (whole_seconds, fraction) = match without_zone.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (without_zone, None),
    };

    // Fractions only follow seconds: 1 to 9 digits
    let formats = match fraction {
        Some(f) if f.is_empty() || f.len() > 9 || !f.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(invalid());
        }
        Some(_) => &DATE_TIME_FORMATS[..1],
        None => &DATE_TIME_FORMATS[..],
    };

    formats
        .iter()
        .find_map(|format| {
            let parsed = NaiveDateTime::parse_from_str(whole_seconds, format).ok()?;
            let canonical = parsed.format(format).to_string() == whole_seconds;
            (canonical && parsed.nanosecond() < 1_000_000_000).then_some(parsed)
        })
        .ok_or_else(invalid)
}

/// Resolve the timestamp of a new event, falling back to the current UTC time
pub fn resolve_event_timestamp(raw: Option<&str>) -> Result<NaiveDateTime, TrackingError> {
    match raw {
        Some(raw) => parse_event_timestamp(raw),
        None => Ok(Utc::now().naive_utc().trunc_subsecs(0)),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
