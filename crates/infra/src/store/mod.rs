//! Durable mapping/watermark storage

mod sqlite;

pub use sqlite::SqliteMappingStore;
