//! Toggl Track API adapter

mod client;

pub use client::TogglClient;
