use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::package::{Event, EventStatus, NewEvent, NewPackage, Package, TrackingCode};
use super::{EventRepository, PackageRepository, StoreError};

// ============================================================================
// PostgreSQL Store
// ============================================================================
//
// Tables:
// - package(tracking_code PK, client_name, delivery_address)
// - event(id BIGSERIAL PK, event_timestamp, status, description, tracking_code FK)
//
// Reads that need a package's events use one LEFT JOIN instead of a query
// per event. The cascade delete is an explicit transaction; the FK's
// ON DELETE CASCADE only backs it up.
//
// ============================================================================

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS package (
        tracking_code VARCHAR(50) PRIMARY KEY,
        client_name VARCHAR(100) NOT NULL,
        delivery_address TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS event (
        id BIGSERIAL PRIMARY KEY,
        event_timestamp TIMESTAMP NOT NULL,
        status VARCHAR(50) NOT NULL,
        description TEXT,
        tracking_code VARCHAR(50) NOT NULL
            REFERENCES package (tracking_code) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS event_tracking_code_timestamp_idx
        ON event (tracking_code, event_timestamp DESC)",
];

const PACKAGE_WITH_EVENTS: &str =
    "SELECT p.tracking_code, p.client_name, p.delivery_address,
            e.id, e.event_timestamp, e.status, e.description
     FROM package p
     LEFT JOIN event e ON e.tracking_code = p.tracking_code
     WHERE p.tracking_code = $1
     ORDER BY e.event_timestamp DESC, e.id ASC";

const ALL_PACKAGES_WITH_EVENTS: &str =
    "SELECT p.tracking_code, p.client_name, p.delivery_address,
            e.id, e.event_timestamp, e.status, e.description
     FROM package p
     LEFT JOIN event e ON e.tracking_code = p.tracking_code
     ORDER BY p.tracking_code ASC, e.event_timestamp DESC, e.id ASC";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("✅ Package tracking schema ready");
        Ok(())
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

/// Event columns as read from the database, before the status is checked
#[derive(Debug, Clone)]
struct EventColumns {
    id: i64,
    tracking_code: String,
    timestamp: NaiveDateTime,
    status: String,
    description: Option<String>,
}

/// One row of the package LEFT JOIN event query
#[derive(Debug, Clone)]
struct JoinedRow {
    tracking_code: String,
    client_name: String,
    delivery_address: String,
    event: Option<EventColumns>,
}

impl EventColumns {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            tracking_code: row.try_get("tracking_code")?,
            timestamp: row.try_get("event_timestamp")?,
            status: row.try_get("status")?,
            description: row.try_get("description")?,
        })
    }

    fn into_event(self) -> Result<Event, StoreError> {
        let status = self.status.parse::<EventStatus>().map_err(|_| {
            StoreError::CorruptRow(format!("event {} has unknown status {}", self.id, self.status))
        })?;

        Ok(Event {
            id: self.id,
            tracking_code: TrackingCode::new(self.tracking_code),
            timestamp: self.timestamp,
            status,
            description: self.description,
        })
    }
}

impl JoinedRow {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let tracking_code: String = row.try_get("tracking_code")?;
        let event_id: Option<i64> = row.try_get("id")?;

        let event = match event_id {
            Some(id) => Some(EventColumns {
                id,
                tracking_code: tracking_code.clone(),
                timestamp: row.try_get("event_timestamp")?,
                status: row.try_get("status")?,
                description: row.try_get("description")?,
            }),
            None => None,
        };

        Ok(Self {
            tracking_code,
            client_name: row.try_get("client_name")?,
            delivery_address: row.try_get("delivery_address")?,
            event,
        })
    }
}

/// Fold joined rows into packages, keeping the query's row order.
/// Rows of one package must be contiguous.
fn group_joined_rows(rows: Vec<JoinedRow>) -> Result<Vec<Package>, StoreError> {
    let mut packages: Vec<Package> = Vec::new();

    for row in rows {
        let starts_new = packages
            .last()
            .map_or(true, |current| current.tracking_code.as_str() != row.tracking_code);

        if starts_new {
            packages.push(Package {
                tracking_code: TrackingCode::new(row.tracking_code),
                client_name: row.client_name,
                delivery_address: row.delivery_address,
                events: Vec::new(),
            });
        }

        if let (Some(columns), Some(current)) = (row.event, packages.last_mut()) {
            current.events.push(columns.into_event()?);
        }
    }

    Ok(packages)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

// ============================================================================
// Repository Implementations
// ============================================================================

#[async_trait]
impl PackageRepository for PgStore {
    async fn package_exists(&self, tracking_code: &TrackingCode) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM package WHERE tracking_code = $1)")
                .bind(tracking_code.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert_package(&self, package: NewPackage) -> Result<Package, StoreError> {
        let result = sqlx::query(
            "INSERT INTO package (tracking_code, client_name, delivery_address) VALUES ($1, $2, $3)",
        )
        .bind(package.tracking_code.as_str())
        .bind(&package.client_name)
        .bind(&package.delivery_address)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Package::new(package)),
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::DuplicatePackage(package.tracking_code))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_package_with_events(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Option<Package>, StoreError> {
        let rows = sqlx::query(PACKAGE_WITH_EVENTS)
            .bind(tracking_code.as_str())
            .fetch_all(&self.pool)
            .await?;

        let joined = rows
            .iter()
            .map(JoinedRow::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(group_joined_rows(joined)?.into_iter().next())
    }

    async fn list_packages_with_events(&self) -> Result<Vec<Package>, StoreError> {
        let rows = sqlx::query(ALL_PACKAGES_WITH_EVENTS)
            .fetch_all(&self.pool)
            .await?;

        let joined = rows
            .iter()
            .map(JoinedRow::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        group_joined_rows(joined)
    }

    async fn delete_package_cascade(
        &self,
        tracking_code: &TrackingCode,
    ) -> Result<Option<u64>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let events_removed = sqlx::query("DELETE FROM event WHERE tracking_code = $1")
            .bind(tracking_code.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let packages_removed = sqlx::query("DELETE FROM package WHERE tracking_code = $1")
            .bind(tracking_code.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if packages_removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;

        tracing::debug!(
            tracking_code = %tracking_code,
            events_removed = events_removed,
            "Committed cascade delete"
        );

        Ok(Some(events_removed))
    }
}

#[async_trait]
impl EventRepository for PgStore {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
            "INSERT INTO event (event_timestamp, status, description, tracking_code)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(event.timestamp)
        .bind(event.status.as_str())
        .bind(event.description.as_deref())
        .bind(event.tracking_code.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(Event::new(id, event)),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(StoreError::MissingPackage(event.tracking_code))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query(
            "SELECT id, tracking_code, event_timestamp, status, description
             FROM event WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(EventColumns::from_row)
            .transpose()?
            .map(EventColumns::into_event)
            .transpose()
    }

    async fn events_by_package(&self, tracking_code: &TrackingCode) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, tracking_code, event_timestamp, status, description
             FROM event WHERE tracking_code = $1
             ORDER BY event_timestamp DESC, id ASC",
        )
        .bind(tracking_code.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| EventColumns::from_row(row)?.into_event())
            .collect()
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, tracking_code, event_timestamp, status, description
             FROM event ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| EventColumns::from_row(row)?.into_event())
            .collect()
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool, StoreError> {
        let removed = sqlx::query("DELETE FROM event WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// Queries against a live database are exercised by running the service with
// STORE_BACKEND=postgres; these tests cover the row folding.
//
// ============================================================================
