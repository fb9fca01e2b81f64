use std::sync::Arc;

use crate::domain::package::{
    resolve_event_timestamp, NewEvent, RecordEvent, TrackingCode, TrackingError,
};
use crate::dto::EventResponse;
use crate::store::{EventRepository, PackageRepository, TrackingStore};

// ============================================================================
// Event Service
// ============================================================================

pub struct EventService {
    store: Arc<dyn TrackingStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn TrackingStore>) -> Self {
        Self { store }
    }

    /// Append a status event to an existing package
    pub async fn create(
        &self,
        tracking_code: &TrackingCode,
        command: RecordEvent,
    ) -> Result<EventResponse, TrackingError> {
        let timestamp = resolve_event_timestamp(command.timestamp.as_deref())?;

        if !self.store.package_exists(tracking_code).await? {
            return Err(TrackingError::package_not_found(tracking_code));
        }

        let event = self
            .store
            .insert_event(NewEvent {
                tracking_code: tracking_code.clone(),
                timestamp,
                status: command.status,
                description: command.description,
            })
            .await?;

        tracing::info!(
            tracking_code = %tracking_code,
            event_id = event.id,
            status = %event.status,
            timestamp = %event.timestamp,
            "✅ Event recorded"
        );

        Ok(EventResponse::from(&event))
    }

    /// Events of one package, most recent first
    pub async fn list_by_tracking_code(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Vec<EventResponse>, TrackingError> {
        if !self.store.package_exists(tracking_code).await? {
            return Err(TrackingError::package_not_found(tracking_code));
        }

        let events = self.store.events_by_package(tracking_code).await?;
        tracing::debug!(
            tracking_code = %tracking_code,
            event_count = events.len(),
            "Loaded package events"
        );

        Ok(events.iter().map(EventResponse::from).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<EventResponse>, TrackingError> {
        let events = self.store.list_events().await?;
        Ok(events.iter().map(EventResponse::from).collect())
    }

    pub async fn delete(&self, event_id: i64) -> Result<(), TrackingError> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or_else(|| TrackingError::event_not_found(event_id))?;

        if !self.store.delete_event(event_id).await? {
            return Err(TrackingError::event_not_found(event_id));
        }

        tracing::info!(
            event_id = event_id,
            tracking_code = %event.tracking_code,
            "🗑️ Event deleted"
        );

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::{EventStatus, NewPackage};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    async fn setup() -> (Arc<MemoryStore>, EventService) {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_package(NewPackage {
                tracking_code: TrackingCode::new("TRK1"),
                client_name: "Alice".to_string(),
                delivery_address: "123 Main St".to_string(),
            })
            .await
            .unwrap();
        let service = EventService::new(store.clone());
        (store, service)
    }

    fn record(status: EventStatus, timestamp: &str) -> RecordEvent {
        RecordEvent {
            status,
            description: None,
            timestamp: Some(timestamp.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_timestamp() {
        let (_, service) = setup().await;

        let event = service
            .create(
                &TrackingCode::new("TRK1"),
                record(EventStatus::Shipped, "2025-11-05T14:33:00.000Z"),
            )
            .await
            .unwrap();

        let expected = NaiveDate::from_ymd_opt(2025, 11, 5)
            .unwrap()
            .and_hms_opt(14, 33, 0)
            .unwrap();
        assert_eq!(event.event_timestamp, expected);
        assert_eq!(event.status, EventStatus::Shipped);
        assert_eq!(event.tracking_code, "TRK1");
    }

    #[tokio::test]
    async fn test_create_for_unknown_package_writes_nothing() {
        let (store, service) = setup().await;

        let result = service
            .create(
                &TrackingCode::new("NOPE"),
                record(EventStatus::Created, "2025-11-05T10:00:00"),
            )
            .await;
        assert!(matches!(result, Err(TrackingError::NotFound(_))));
        assert!(store.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_bad_timestamp() {
        let (store, service) = setup().await;

        let result = service
            .create(&TrackingCode::new("TRK1"), record(EventStatus::Created, "not-a-date"))
            .await;
        assert!(matches!(result, Err(TrackingError::Validation(_))));
        assert!(store.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_timestamp_uses_now() {
        let (_, service) = setup().await;

        let event = service
            .create(
                &TrackingCode::new("TRK1"),
                RecordEvent {
                    status: EventStatus::Created,
                    description: Some("Label printed".to_string()),
                    timestamp: None,
                },
            )
            .await
            .unwrap();

        let age = chrono::Utc::now().naive_utc() - event.event_timestamp;
        assert!(age.num_seconds() < 5);
        assert_eq!(event.description.as_deref(), Some("Label printed"));
    }

    #[tokio::test]
    async fn test_list_by_tracking_code_newest_first() {
        let (_, service) = setup().await;
        let code = TrackingCode::new("TRK1");

        service.create(&code, record(EventStatus::Created, "2025-11-01T08:00:00")).await.unwrap();
        service.create(&code, record(EventStatus::Delivered, "2025-11-04T17:30:00Z")).await.unwrap();
        service.create(&code, record(EventStatus::InTransit, "2025-11-02T12:00:00.500")).await.unwrap();

        let events = service.list_by_tracking_code(&code).await.unwrap();
        let statuses: Vec<EventStatus> = events.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![EventStatus::Delivered, EventStatus::InTransit, EventStatus::Created]
        );
        assert!(events.windows(2).all(|w| w[0].event_timestamp >= w[1].event_timestamp));
    }

    #[tokio::test]
    async fn test_list_by_unknown_package() {
        let (_, service) = setup().await;
        let result = service.list_by_tracking_code(&TrackingCode::new("NOPE")).await;
        assert!(matches!(result, Err(TrackingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_event_leaves_package() {
        let (store, service) = setup().await;
        let code = TrackingCode::new("TRK1");
        let event = service
            .create(&code, record(EventStatus::Created, "2025-11-01T08:00:00"))
            .await
            .unwrap();

        service.delete(event.id).await.unwrap();

        assert!(store.package_exists(&code).await.unwrap());
        assert!(service.list_all().await.unwrap().is_empty());

        let again = service.delete(event.id).await;
        assert!(matches!(again, Err(TrackingError::NotFound(_))));
    }
}
