use std::sync::Arc;

use actix_web::web;

use crate::config::AuthConfig;
use crate::metrics::{self, Metrics};
use crate::services::{EventService, PackageService};
use crate::store::TrackingStore;

mod auth;
mod errors;
mod events;
mod packages;

// ============================================================================
// HTTP Surface
// ============================================================================
//
//   /api/packages ...        package CRUD
//   /api/events ...          event CRUD
//   /auth/login, /logout     operator login
//   /health, /metrics        probes and Prometheus scrape
//
// ============================================================================

/// Shared handles cloned into every worker
#[derive(Clone)]
pub struct AppState {
    packages: web::Data<PackageService>,
    events: web::Data<EventService>,
    metrics: web::Data<Metrics>,
    auth: web::Data<AuthConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn TrackingStore>, metrics: Metrics, auth: AuthConfig) -> Self {
        Self {
            packages: web::Data::new(PackageService::new(store.clone())),
            events: web::Data::new(EventService::new(store)),
            metrics: web::Data::new(metrics),
            auth: web::Data::new(auth),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.packages.clone())
            .app_data(self.events.clone())
            .app_data(self.metrics.clone())
            .app_data(self.auth.clone())
            .app_data(web::JsonConfig::default().error_handler(errors::json_error_handler))
            .app_data(web::PathConfig::default().error_handler(errors::path_error_handler))
            .service(
                web::scope("/api")
                    .configure(packages::routes)
                    .configure(events::routes),
            )
            .service(web::scope("/auth").configure(auth::routes))
            .configure(metrics::routes);
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
