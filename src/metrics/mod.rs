// Private module declaration
mod routes;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::domain::package::{EventStatus, TrackingError};

// Re-export for public API
pub use routes::routes;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Tracks:
// - Package lifecycle (created, deleted)
// - Event lifecycle (recorded by status, deleted)
// - API failures by error category
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Package Metrics
    pub packages_created: IntCounter,
    pub packages_deleted: IntCounter,

    // Event Metrics
    pub events_recorded: IntCounterVec,
    pub events_deleted: IntCounter,

    // API Metrics
    pub api_errors: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let packages_created = IntCounter::new(
            "packages_created_total",
            "Total packages created",
        )?;
        registry.register(Box::new(packages_created.clone()))?;

        let packages_deleted = IntCounter::new(
            "packages_deleted_total",
            "Total packages deleted together with their events",
        )?;
        registry.register(Box::new(packages_deleted.clone()))?;

        let events_recorded = IntCounterVec::new(
            Opts::new("events_recorded_total", "Total tracking events recorded"),
            &["status"],
        )?;
        registry.register(Box::new(events_recorded.clone()))?;

        let events_deleted = IntCounter::new(
            "events_deleted_total",
            "Total tracking events deleted individually",
        )?;
        registry.register(Box::new(events_deleted.clone()))?;

        let api_errors = IntCounterVec::new(
            Opts::new("api_errors_total", "Total failed API requests"),
            &["category"],
        )?;
        registry.register(Box::new(api_errors.clone()))?;

        Ok(Self {
            registry,
            packages_created,
            packages_deleted,
            events_recorded,
            events_deleted,
            api_errors,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_event(&self, status: EventStatus) {
        self.events_recorded.with_label_values(&[status.as_str()]).inc();
    }

    pub fn record_error(&self, err: &TrackingError) {
        self.api_errors.with_label_values(&[err.category()]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.registry().gather().len() > 0);
    }

    #[test]
    fn test_record_event_by_status() {
        let metrics = Metrics::new().unwrap();
        metrics.record_event(EventStatus::Shipped);
        metrics.record_event(EventStatus::Shipped);
        metrics.record_event(EventStatus::Delivered);

        let gathered = metrics.registry().gather();
        let recorded = gathered.iter().find(|m| m.name() == "events_recorded_total").unwrap();
        assert_eq!(recorded.metric.len(), 2); // Two different status labels
    }

    #[test]
    fn test_record_error_by_category() {
        let metrics = Metrics::new().unwrap();
        metrics.record_error(&TrackingError::Validation("bad".to_string()));
        metrics.record_error(&TrackingError::Validation("worse".to_string()));

        let errors = metrics
            .api_errors
            .with_label_values(&["Validation Error"])
            .get();
        assert_eq!(errors, 2);
    }

    #[test]
    fn test_package_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.packages_created.inc();
        metrics.packages_deleted.inc();

        let gathered = metrics.registry().gather();
        let created = gathered.iter().find(|m| m.name() == "packages_created_total").unwrap();
        assert_eq!(created.metric[0].counter.value, Some(1.0));
    }
}
