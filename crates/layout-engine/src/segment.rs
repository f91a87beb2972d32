//! Clip events to the boundaries of a single window.
//!
//! Each event yields zero or one segment per window. Events that start
//! before or end after the window are truncated and flagged so the view can
//! show that they continue on the neighbouring day.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::event::Event;
use crate::time::{minutes_diff, Window};

/// An event's time range clipped to one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub event: Event,
    pub clipped_start: DateTime<Utc>,
    pub clipped_end: DateTime<Utc>,
    pub continues_before: bool,
    pub continues_after: bool,
}

impl Segment {
    /// Clip `event` to `window`.
    ///
    /// # Errors
    /// Returns `LayoutError::DegenerateInterval` when the event does not
    /// intersect the window or the clipped range is empty.
    pub fn clip(event: &Event, window: &Window) -> Result<Self> {
        let clipped_start = event.start_at.max(window.start);
        let clipped_end = event.end_at.min(window.end);

        if !window.intersects(event.start_at, event.end_at) || clipped_start >= clipped_end {
            return Err(LayoutError::DegenerateInterval {
                start: clipped_start.to_rfc3339(),
                end: clipped_end.to_rfc3339(),
            });
        }

        Ok(Self {
            event: event.clone(),
            clipped_start,
            clipped_end,
            continues_before: event.start_at < window.start,
            continues_after: event.end_at > window.end,
        })
    }

    /// Clipped length, rounded to the nearest minute.
    pub fn duration_minutes(&self) -> i64 {
        minutes_diff(self.clipped_end, self.clipped_start)
    }
}

/// Clip every event to `[window_start, window_end)`.
///
/// Events outside the window and degenerate results are dropped. The output
/// carries no ordering guarantee.
pub fn segment(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Segment> {
    let window = Window {
        start: window_start,
        end: window_end,
    };
    segment_window(events, &window)
}

/// [`segment`] for an already-built [`Window`].
pub fn segment_window(events: &[Event], window: &Window) -> Vec<Segment> {
    events
        .iter()
        // Touching the window edge is not an overlap.
        .filter(|e| e.start_at < window.end && e.end_at > window.start)
        .filter_map(|e| match Segment::clip(e, window) {
            Ok(seg) => Some(seg),
            Err(err) => {
                debug!(event_id = %e.id, error = %err, "dropping segment");
                None
            }
        })
        .collect()
}
