//! # Timebridge Domain
//!
//! Business domain types for timebridge.
//!
//! This crate contains:
//! - Domain data types (TimeEntry, EventDraft, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other timebridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
