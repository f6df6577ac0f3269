//! The sync pass: watermark resolution, fetch, per-record reconciliation,
//! watermark commit.

pub mod ports;
mod service;

pub use service::{SyncOutcome, SyncReport, SyncService};
