//! Calendar events, drafts, and ingestion of raw event records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LayoutError, Result};
use crate::time::{minutes_diff, parse_instant};

/// Longest duration a single event may span.
pub const MAX_EVENT_DURATION_MINUTES: i64 = 24 * 60;

/// Title shown for events whose title is blank.
pub const UNTITLED: &str = "(untitled)";

/// A calendar event as held by the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// The trimmed title, or [`UNTITLED`] when it is blank.
    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            UNTITLED
        } else {
            trimmed
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        minutes_diff(self.end_at, self.start_at)
    }

    /// Apply the same checks a draft goes through before it reaches the store.
    ///
    /// # Errors
    /// Returns `LayoutError::InvalidEventInput` when the interval is inverted,
    /// empty, or longer than [`MAX_EVENT_DURATION_MINUTES`].
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.start_at, self.end_at)
    }
}

/// A validated-by-the-form event that has not yet been given an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_at,
            end_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// # Errors
    /// Returns `LayoutError::InvalidEventInput` when `start_at >= end_at` or the
    /// event is longer than [`MAX_EVENT_DURATION_MINUTES`].
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.start_at, self.end_at)
    }
}

fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if start >= end {
        return Err(LayoutError::InvalidEventInput(format!(
            "end ({}) must be after start ({})",
            end.to_rfc3339(),
            start.to_rfc3339()
        )));
    }
    if end - start > Duration::minutes(MAX_EVENT_DURATION_MINUTES) {
        return Err(LayoutError::InvalidEventInput(format!(
            "event lasts {} minutes, longer than the {} minute maximum",
            (end - start).num_minutes(),
            MAX_EVENT_DURATION_MINUTES
        )));
    }
    Ok(())
}

/// An event as persisted or received over the wire, with string timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: String,
    pub end_at: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl EventRecord {
    /// Parse the record's timestamps.
    ///
    /// A missing or unparsable `createdAt` falls back to `startAt`; it is
    /// informational only.
    ///
    /// # Errors
    /// Returns `LayoutError::MalformedInstant` if `startAt` or `endAt` cannot
    /// be parsed, and `LayoutError::DegenerateInterval` if `startAt` is not
    /// before `endAt`.
    pub fn parse(&self) -> Result<Event> {
        let start_at = parse_instant(&self.start_at)?;
        let end_at = parse_instant(&self.end_at)?;
        if start_at >= end_at {
            return Err(LayoutError::DegenerateInterval {
                start: self.start_at.clone(),
                end: self.end_at.clone(),
            });
        }
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| parse_instant(s).ok())
            .unwrap_or(start_at);
        Ok(Event {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_at,
            end_at,
            created_at,
        })
    }
}

impl From<&Event> for EventRecord {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id.clone(),
            title: e.title.clone(),
            description: e.description.clone(),
            start_at: e.start_at.to_rfc3339(),
            end_at: e.end_at.to_rfc3339(),
            created_at: Some(e.created_at.to_rfc3339()),
        }
    }
}

/// Parse a batch of records, dropping the ones with malformed timestamps or
/// an empty or inverted interval so that one bad record cannot blank a whole
/// view.
pub fn ingest(records: &[EventRecord]) -> Vec<Event> {
    records
        .iter()
        .filter_map(|record| match record.parse() {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(event_id = %record.id, error = %err, "dropping event record");
                None
            }
        })
        .collect()
}
