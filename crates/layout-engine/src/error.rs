//! Error types for layout-engine operations.
//!
//! Layout itself never fails: malformed or degenerate records are dropped
//! while segmenting. These errors surface only at the edges, when parsing
//! instants and when mutating the event store.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("Malformed instant: {0}")]
    MalformedInstant(String),

    #[error("Degenerate interval: {start} >= {end}")]
    DegenerateInterval { start: String, end: String },

    #[error("Invalid event input: {0}")]
    InvalidEventInput(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
