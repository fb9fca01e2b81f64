// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Entities, value objects and validation rules for package tracking.
// Nothing in here knows about HTTP or the persistence engine.
//
// ============================================================================

pub mod package;
