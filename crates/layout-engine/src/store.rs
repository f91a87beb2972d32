//! The event store the views read from.
//!
//! [`EventSource`] is the read-only seam the layout consumes. The in-memory
//! store implements it and owns the mutating operations, which validate
//! their input and leave the store untouched on failure.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{LayoutError, Result};
use crate::event::{ingest, Event, EventDraft, EventRecord};
use crate::time::{local_date, Window};

/// Snapshot format version written by [`InMemoryEventStore::to_json`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Read queries a layout pass needs from an event store.
pub trait EventSource {
    /// All events whose interval intersects the half-open `window`, sorted by start.
    fn events_overlapping_window(&self, window: &Window) -> Vec<Event>;

    /// All events that start on `date` in the store's calendar timezone,
    /// sorted by start. No clipping is applied.
    fn events_starting_on_day(&self, date: NaiveDate) -> Vec<Event>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    version: u32,
    events: Vec<EventRecord>,
}

/// Events held in memory, kept sorted by start time.
#[derive(Debug, Clone)]
pub struct InMemoryEventStore {
    tz: Tz,
    events: Vec<Event>,
}

impl InMemoryEventStore {
    /// An empty store whose calendar days are computed in `tz`.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            events: Vec::new(),
        }
    }

    /// A store pre-filled with already-parsed events. Events whose start is
    /// not before their end are dropped.
    pub fn with_events(tz: Tz, mut events: Vec<Event>) -> Self {
        events.retain(|e| {
            let valid = e.start_at < e.end_at;
            if !valid {
                warn!(event_id = %e.id, "dropping event with empty or inverted interval");
            }
            valid
        });
        let mut store = Self { tz, events };
        store.sort();
        store
    }

    /// A store built from raw records; malformed records are dropped.
    pub fn from_records(tz: Tz, records: &[EventRecord]) -> Self {
        Self::with_events(tz, ingest(records))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    fn sort(&mut self) {
        self.events.sort_by_key(|e| e.start_at);
    }

    /// Create an event from a draft, assigning a fresh id and creation time.
    ///
    /// # Errors
    /// Returns `LayoutError::InvalidEventInput` if the draft fails validation.
    pub fn add(&mut self, draft: EventDraft) -> Result<Event> {
        draft.validate()?;
        let event = Event {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            start_at: draft.start_at,
            end_at: draft.end_at,
            created_at: Utc::now(),
        };
        debug!(event_id = %event.id, minutes = event.duration_minutes(), "adding event");
        self.events.push(event.clone());
        self.sort();
        Ok(event)
    }

    /// Replace the event with the same id.
    ///
    /// # Errors
    /// Returns `LayoutError::InvalidEventInput` if the event fails validation,
    /// or `LayoutError::EventNotFound` if no event has that id.
    pub fn update(&mut self, event: Event) -> Result<()> {
        event.validate()?;
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| LayoutError::EventNotFound(event.id.clone()))?;
        debug!(event_id = %event.id, "updating event");
        *slot = event;
        self.sort();
        Ok(())
    }

    /// Remove the event with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        before != self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events intersecting the calendar day `date`.
    pub fn events_touching_day(&self, date: NaiveDate) -> Vec<Event> {
        self.events_overlapping_window(&Window::for_day(date, self.tz))
    }

    /// Calendar days of the given month on which at least one event starts.
    pub fn days_with_events_in_month(&self, year: i32, month: u32) -> BTreeSet<NaiveDate> {
        self.events
            .iter()
            .map(|e| local_date(e.start_at, self.tz))
            .filter(|d| d.year() == year && d.month() == month)
            .collect()
    }

    /// Serialize the store as `{"version": 1, "events": [...]}`.
    ///
    /// # Errors
    /// Returns `LayoutError::Snapshot` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = StoreSnapshot {
            version: SNAPSHOT_VERSION,
            events: self.events.iter().map(EventRecord::from).collect(),
        };
        serde_json::to_string(&snapshot).map_err(|e| LayoutError::Snapshot(e.to_string()))
    }

    /// Restore a store from [`to_json`](Self::to_json) output.
    ///
    /// Records with malformed timestamps are dropped.
    ///
    /// # Errors
    /// Returns `LayoutError::Snapshot` for invalid JSON and
    /// `LayoutError::UnsupportedVersion` for snapshots from another version.
    pub fn from_json(json: &str, tz: Tz) -> Result<Self> {
        let snapshot: StoreSnapshot =
            serde_json::from_str(json).map_err(|e| LayoutError::Snapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LayoutError::UnsupportedVersion(snapshot.version));
        }
        Ok(Self::from_records(tz, &snapshot.events))
    }
}

impl EventSource for InMemoryEventStore {
    fn events_overlapping_window(&self, window: &Window) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| window.intersects(e.start_at, e.end_at))
            .cloned()
            .collect()
    }

    fn events_starting_on_day(&self, date: NaiveDate) -> Vec<Event> {
        let day = Window::for_day(date, self.tz);
        self.events
            .iter()
            .filter(|e| day.contains_instant(e.start_at))
            .cloned()
            .collect()
    }
}
