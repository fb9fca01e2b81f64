use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::domain::package::{
    sort_newest_first, Event, NewEvent, NewPackage, Package, TrackingCode,
};
use super::{EventRepository, PackageRepository, StoreError};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Every operation takes the lock once, so a multi-step write such as the
// cascade delete is observed either entirely or not at all.
//
// ============================================================================

#[derive(Debug, Clone)]
struct PackageRow {
    client_name: String,
    delivery_address: String,
}

#[derive(Debug, Default)]
struct Tables {
    packages: BTreeMap<TrackingCode, PackageRow>,
    events: BTreeMap<i64, Event>,
    /// events_by_package index: parent lookup without a back-reference
    events_by_package: HashMap<TrackingCode, BTreeSet<i64>>,
    last_event_id: i64,
}

impl Tables {
    fn events_of(&self, tracking_code: &TrackingCode) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events_by_package
            .get(tracking_code)
            .into_iter()
            .flatten()
            .filter_map(|id| self.events.get(id).cloned())
            .collect();
        sort_newest_first(&mut events);
        events
    }

    fn assemble(&self, tracking_code: &TrackingCode, row: &PackageRow) -> Package {
        Package {
            tracking_code: tracking_code.clone(),
            client_name: row.client_name.clone(),
            delivery_address: row.delivery_address.clone(),
            events: self.events_of(tracking_code),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn package_exists(&self, tracking_code: &TrackingCode) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.packages.contains_key(tracking_code))
    }

    async fn insert_package(&self, package: NewPackage) -> Result<Package, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.packages.contains_key(&package.tracking_code) {
            return Err(StoreError::DuplicatePackage(package.tracking_code));
        }

        tables.packages.insert(
            package.tracking_code.clone(),
            PackageRow {
                client_name: package.client_name.clone(),
                delivery_address: package.delivery_address.clone(),
            },
        );

        Ok(Package::new(package))
    }

    async fn find_package_with_events(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Option<Package>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .packages
            .get(tracking_code)
            .map(|row| tables.assemble(tracking_code, row)))
    }

    async fn list_packages_with_events(&self) -> Result<Vec<Package>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .packages
            .iter()
            .map(|(code, row)| tables.assemble(code, row))
            .collect())
    }

    async fn delete_package_cascade(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Option<u64>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.packages.contains_key(tracking_code) {
            return Ok(None);
        }

        let event_ids = tables
            .events_by_package
            .remove(tracking_code)
            .unwrap_or_default();
        for id in &event_ids {
            tables.events.remove(id);
        }
        tables.packages.remove(tracking_code);

        Ok(Some(event_ids.len() as u64))
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.packages.contains_key(&event.tracking_code) {
            return Err(StoreError::MissingPackage(event.tracking_code));
        }

        tables.last_event_id += 1;
        let stored = Event::new(tables.last_event_id, event);

        tables
            .events_by_package
            .entry(stored.tracking_code.clone())
            .or_default()
            .insert(stored.id);
        tables.events.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.tables.read().await.events.get(&event_id).cloned())
    }

    async fn events_by_package(&self, tracking_code: &TrackingCode) -> Result<Vec<Event>, StoreError> {
        Ok(self.tables.read().await.events_of(tracking_code))
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.tables.read().await.events.values().cloned().collect())
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.remove(&event_id) else {
            return Ok(false);
        };

        if let Some(ids) = tables.events_by_package.get_mut(&event.tracking_code) {
            ids.remove(&event_id);
        }

        Ok(true)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
