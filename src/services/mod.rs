// ============================================================================
// Service Layer
// ============================================================================
//
// Services validate input, talk to the store, and convert entities into
// boundary shapes before anything leaves this layer.
//
// ============================================================================

pub mod event_service;
pub mod package_service;

pub use event_service::EventService;
pub use package_service::PackageService;
