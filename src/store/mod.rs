// ============================================================================
// Tracking Store - Repository contract and its implementations
// ============================================================================
//
// The services only see `TrackingStore`. Two backends implement it:
// - MemoryStore: in-process tables behind a single RwLock
// - PgStore:     PostgreSQL through sqlx
//
// ============================================================================

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::domain::package::{Event, NewEvent, NewPackage, Package, TrackingCode, TrackingError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Package already stored: {0}")]
    DuplicatePackage(TrackingCode),

    #[error("Parent package missing: {0}")]
    MissingPackage(TrackingCode),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for TrackingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicatePackage(code) => TrackingError::duplicate_package(&code),
            StoreError::MissingPackage(code) => TrackingError::package_not_found(&code),
            other => TrackingError::Unexpected(other.into()),
        }
    }
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn package_exists(&self, tracking_code: &TrackingCode) -> Result<bool, StoreError>;

    /// Fails with `DuplicatePackage` when the tracking code is taken
    async fn insert_package(&self, package: NewPackage) -> Result<Package, StoreError>;

    /// Package with all its events (newest first), in one round trip
    async fn find_package_with_events(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Option<Package>, StoreError>;

    async fn list_packages_with_events(&self) -> Result<Vec<Package>, StoreError>;

    /// Delete the package's events, then the package, atomically.
    /// Returns the number of events removed, or `None` if no package matched.
    async fn delete_package_cascade(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Option<u64>, StoreError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fails with `MissingPackage` when the parent does not exist
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError>;

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, StoreError>;

    async fn events_by_package(&self, tracking_code: &TrackingCode) -> Result<Vec<Event>, StoreError>;

    /// All events in ascending id order
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    async fn delete_event(&self, event_id: i64) -> Result<bool, StoreError>;
}

pub trait TrackingStore: PackageRepository + EventRepository {}

impl<T: PackageRepository + EventRepository> TrackingStore for T {}

/// Build the configured backend
pub async fn connect(config: &StoreConfig) -> anyhow::Result<Arc<dyn TrackingStore>> {
    match config {
        StoreConfig::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreConfig::Postgres { url, max_connections } => {
            tracing::info!(max_connections = *max_connections, "Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(url)
                .await?;

            let store = PgStore::new(pool);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
