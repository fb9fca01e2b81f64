use chrono::NaiveDateTime;

use super::value_objects::{EventStatus, TrackingCode};

// ============================================================================
// Package & Event Entities
// ============================================================================
//
// A package owns its events by value. An event refers to its parent only
// through the tracking code, so no object graph built from these types can
// contain a cycle.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub tracking_code: TrackingCode,
    pub client_name: String,
    pub delivery_address: String,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub tracking_code: TrackingCode,
    pub timestamp: NaiveDateTime,
    pub status: EventStatus,
    pub description: Option<String>,
}

/// Validated package ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackage {
    pub tracking_code: TrackingCode,
    pub client_name: String,
    pub delivery_address: String,
}

/// Event ready to be persisted; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub tracking_code: TrackingCode,
    pub timestamp: NaiveDateTime,
    pub status: EventStatus,
    pub description: Option<String>,
}

impl Package {
    pub fn new(package: NewPackage) -> Self {
        Self {
            tracking_code: package.tracking_code,
            client_name: package.client_name,
            delivery_address: package.delivery_address,
            events: Vec::new(),
        }
    }

    /// Most recent event by timestamp, which determines the package state
    pub fn latest_event(&self) -> Option<&Event> {
        self.events
            .iter()
            .min_by(|a, b| newest_first(a, b))
    }
}

impl Event {
    pub fn new(id: i64, event: NewEvent) -> Self {
        Self {
            id,
            tracking_code: event.tracking_code,
            timestamp: event.timestamp,
            status: event.status,
            description: event.description,
        }
    }
}

/// Ordering used for every event listing: timestamp descending, then id ascending
pub fn newest_first(a: &Event, b: &Event) -> std::cmp::Ordering {
    b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id))
}

pub fn sort_newest_first(events: &mut [Event]) {
    events.sort_by(newest_first);
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: i64, day: u32, status: EventStatus) -> Event {
        Event {
            id,
            tracking_code: TrackingCode::new("TRK1"),
            timestamp: NaiveDate::from_ymd_opt(2025, 11, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            status,
            description: None,
        }
    }

    #[test]
    fn test_sort_newest_first_with_id_tiebreak() {
        let mut events = vec![
            event(1, 3, EventStatus::Created),
            event(2, 5, EventStatus::Shipped),
            event(4, 4, EventStatus::InTransit),
            event(3, 4, EventStatus::InTransit),
        ];

        sort_newest_first(&mut events);

        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_latest_event_ignores_insertion_order() {
        let mut package = Package::new(NewPackage {
            tracking_code: TrackingCode::new("TRK1"),
            client_name: "Alice".to_string(),
            delivery_address: "123 Main St".to_string(),
        });
        assert!(package.latest_event().is_none());

        package.events.push(event(1, 9, EventStatus::Delivered));
        package.events.push(event(2, 1, EventStatus::Created));

        assert_eq!(package.latest_event().unwrap().status, EventStatus::Delivered);
    }
}
