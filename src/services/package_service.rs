use std::sync::Arc;

use crate::domain::package::{CreatePackage, TrackingCode, TrackingError};
use crate::dto::PackageResponse;
use crate::store::{PackageRepository, TrackingStore};

// ============================================================================
// Package Service
// ============================================================================
//
// Orchestrates: Command → Validation → Store → Response
//
// ============================================================================

pub struct PackageService {
    store: Arc<dyn TrackingStore>,
}

impl PackageService {
    pub fn new(store: Arc<dyn TrackingStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, command: CreatePackage) -> Result<PackageResponse, TrackingError> {
        let new_package = command.validate()?;

        if self.store.package_exists(&new_package.tracking_code).await? {
            tracing::warn!(
                tracking_code = %new_package.tracking_code,
                "Rejected duplicate tracking code"
            );
            return Err(TrackingError::duplicate_package(&new_package.tracking_code));
        }

        let package = self.store.insert_package(new_package).await?;

        tracing::info!(
            tracking_code = %package.tracking_code,
            client_name = %package.client_name,
            "✅ Package created"
        );

        Ok(PackageResponse::from(&package))
    }

    pub async fn get_by_tracking_code(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<PackageResponse, TrackingError> {
        let package = self
            .store
            .find_package_with_events(tracking_code)
            .await?
            .ok_or_else(|| TrackingError::package_not_found(tracking_code))?;

        tracing::debug!(
            tracking_code = %tracking_code,
            event_count = package.events.len(),
            latest_status = ?package.latest_event().map(|e| e.status),
            "Loaded package"
        );

        Ok(PackageResponse::from(&package))
    }

    pub async fn list_all(&self) -> Result<Vec<PackageResponse>, TrackingError> {
        let packages = self.store.list_packages_with_events().await?;
        tracing::debug!("Loaded {} packages", packages.len());
        Ok(packages.iter().map(PackageResponse::from).collect())
    }

    /// Remove the package and every event it owns in one transaction
    pub async fn delete(&self, tracking_code: &TrackingCode) -> Result<(), TrackingError> {
        if !self.store.package_exists(tracking_code).await? {
            return Err(TrackingError::package_not_found(tracking_code));
        }

        let events_removed = self
            .store
            .delete_package_cascade(tracking_code)
            .await?
            .ok_or_else(|| TrackingError::package_not_found(tracking_code))?;

        tracing::info!(
            tracking_code = %tracking_code,
            events_removed = events_removed,
            "🗑️ Package deleted"
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
    use crate::domain::package::{EventStatus, NewEvent};
    use crate::store::{EventRepository, MemoryStore};
    use chrono::NaiveDate;

    fn create_command(code: &str) -> CreatePackage {
        CreatePackage {
            tracking_code: code.to_string(),
            client_name: "Alice".to_string(),
            delivery_address: "123 Main St".to_string(),
        }
    }

    fn setup() -> (Arc<MemoryStore>, PackageService) {
        let store = Arc::new(MemoryStore::new());
        let service = PackageService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (_, service) = setup();

        let created = service.create(create_command("TRK1")).await.unwrap();
        assert!(created.events.is_empty());

        let fetched = service
            .get_by_tracking_code(&TrackingCode::new("TRK1"))
            .await
            .unwrap();
        assert_eq!(fetched.client_name, "Alice");
        assert_eq!(fetched.delivery_address, "123 Main St");
        assert!(fetched.events.is_empty());
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_tracking_code_conflicts_without_write() {
        let (_, service) = setup();
        service.create(create_command("TRK1")).await.unwrap();

        let mut second = create_command("TRK1");
        second.client_name = "Mallory".to_string();
        let result = service.create(second).await;
        assert!(matches!(result, Err(TrackingError::Conflict(_))));

        let stored = service
            .get_by_tracking_code(&TrackingCode::new("TRK1"))
            .await
            .unwrap();
        assert_eq!(stored.client_name, "Alice");
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_command_is_not_persisted() {
        let (_, service) = setup();

        let result = service.create(create_command("")).await;
        assert!(matches!(result, Err(TrackingError::Validation(_))));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_package() {
        let (_, service) = setup();
        let result = service.get_by_tracking_code(&TrackingCode::new("NOPE")).await;
        assert!(matches!(result, Err(TrackingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_all_includes_events() {
        let (store, service) = setup();
        service.create(create_command("TRK1")).await.unwrap();
        service.create(create_command("TRK2")).await.unwrap();

        store
            .insert_event(NewEvent {
                tracking_code: TrackingCode::new("TRK2"),
                timestamp: NaiveDate::from_ymd_opt(2025, 11, 5)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                status: EventStatus::Created,
                description: None,
            })
            .await
            .unwrap();

        let packages = service.list_all().await.unwrap();
        assert_eq!(packages.len(), 2);
        let trk2 = packages.iter().find(|p| p.tracking_code == "TRK2").unwrap();
        assert_eq!(trk2.events.len(), 1);
        assert_eq!(trk2.events[0].tracking_code, "TRK2");
    }

    #[tokio::test]
    async fn test_delete_unknown_package() {
        let (_, service) = setup();
        let result = service.delete(&TrackingCode::new("NOPE")).await;
        assert!(matches!(result, Err(TrackingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_events() {
        let (store, service) = setup();
        service.create(create_command("TRK1")).await.unwrap();
        for hour in [8, 12] {
            store
                .insert_event(NewEvent {
                    tracking_code: TrackingCode::new("TRK1"),
                    timestamp: NaiveDate::from_ymd_opt(2025, 11, 5)
                        .unwrap()
                        .and_hms_opt(hour, 0, 0)
                        .unwrap(),
                    status: EventStatus::InTransit,
                    description: None,
                })
                .await
                .unwrap();
        }

        service.delete(&TrackingCode::new("TRK1")).await.unwrap();

        assert!(store.list_events().await.unwrap().is_empty());
        let result = service.get_by_tracking_code(&TrackingCode::new("TRK1")).await;
        assert!(matches!(result, Err(TrackingError::NotFound(_))));
    }
}
