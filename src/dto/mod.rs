use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Forms posted by the game pages.
pub mod game;
/// Health endpoint payloads.
pub mod health;
/// HTML rendering of the game pages.
pub mod page;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
