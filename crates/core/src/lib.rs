//! # Timebridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The reconciliation service (the sync pass)
//! - Port/adapter interfaces (traits)
//! - The day-template planner
//!
//! ## Architecture Principles
//! - Only depends on `timebridge-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod sync;
pub mod template;

// Re-export specific items to avoid ambiguity
pub use sync::ports::{CalendarPort, MappingStore, TimeEntrySource};
pub use sync::{SyncOutcome, SyncReport, SyncService};
pub use template::plan_day;
