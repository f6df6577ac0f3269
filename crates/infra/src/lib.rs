//! # Timebridge Infra
//!
//! Infrastructure adapters behind the core ports:
//! - Toggl Track HTTP client ([`TogglClient`])
//! - Google Calendar HTTP client ([`GoogleCalendarClient`]) with token
//!   refresh
//! - SQLite mapping/watermark store ([`SqliteMappingStore`])
//! - Environment configuration loader and template file IO

pub mod config;
pub mod errors;
pub mod google;
pub mod store;
pub mod templates;
pub mod toggl;

pub use google::{GoogleCalendarClient, GoogleCredentials};
pub use store::SqliteMappingStore;
pub use toggl::TogglClient;
