// ============================================================================
// Package Domain - Packages and their tracking events
// ============================================================================
//
// - Value objects (TrackingCode, EventStatus, timestamp parsing)
// - Entities (Package, Event)
// - Commands (CreatePackage, RecordEvent)
// - Errors (TrackingError)
//
// ============================================================================

pub mod value_objects;
pub mod entities;
pub mod commands;
pub mod errors;

pub use value_objects::*;
pub use entities::*;
pub use commands::*;
pub use errors::*;
