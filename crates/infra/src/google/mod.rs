//! Google Calendar API adapter

mod auth;
mod calendar;

pub use auth::{GoogleCredentials, TokenManager};
pub use calendar::GoogleCalendarClient;
