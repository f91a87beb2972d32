//! Day and week layouts built on top of the segmenter and the packer.

use chrono::{Days, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::color::{palette_index, EVENT_PALETTE};
use crate::pack::{pack, PositionedSegment};
use crate::segment::segment_window;
use crate::store::EventSource;
use crate::time::{week_start, Window};

/// Days in a week view.
pub const DAYS_PER_WEEK: u64 = 7;

/// Readiness state owned by the caller.
///
/// Until the event store has been loaded (`hydrated`), views lay out nothing
/// rather than briefly rendering stale or placeholder data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub hydrated: bool,
}

impl ViewState {
    pub fn ready() -> Self {
        Self { hydrated: true }
    }
}

/// Positioned segments for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLayout {
    pub date: NaiveDate,
    /// Timezone that defines the calendar day and the wall clock of the grid.
    #[serde(skip)]
    pub tz: Tz,
    pub window: Window,
    pub segments: Vec<PositionedSegment>,
}

/// Seven consecutive day layouts, starting on Sunday.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekLayout {
    pub week_start: NaiveDate,
    pub days: Vec<DayLayout>,
}

/// What a view needs to draw one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBox {
    pub event_id: String,
    pub title: String,
    pub start_minute: i64,
    pub duration_minutes: i64,
    pub col_index: usize,
    pub col_count: usize,
    pub continues_before: bool,
    pub continues_after: bool,
    pub color: usize,
}

impl DayLayout {
    /// Flatten the layout into drawable boxes, in segment order.
    pub fn boxes(&self) -> Vec<EventBox> {
        self.segments
            .iter()
            .map(|p| EventBox {
                event_id: p.event_id().to_string(),
                title: p.segment.event.display_title().to_string(),
                start_minute: p.start_minute(self.tz),
                duration_minutes: p.display_duration_minutes(self.tz),
                col_index: p.col_index,
                col_count: p.col_count,
                continues_before: p.segment.continues_before,
                continues_after: p.segment.continues_after,
                color: palette_index(p.event_id(), EVENT_PALETTE.len()),
            })
            .collect()
    }
}

/// Lay out the calendar day `date` as seen in `tz`.
pub fn layout_day<S>(source: &S, date: NaiveDate, tz: Tz, state: &ViewState) -> DayLayout
where
    S: EventSource + ?Sized,
{
    let window = Window::for_day(date, tz);
    if !state.hydrated {
        return DayLayout {
            date,
            tz,
            window,
            segments: Vec::new(),
        };
    }

    let events = source.events_overlapping_window(&window);
    let segments = pack(segment_window(&events, &window));
    debug!(
        day = %date,
        window_minutes = window.duration_minutes(),
        events = events.len(),
        segments = segments.len(),
        "laid out day"
    );

    DayLayout {
        date,
        tz,
        window,
        segments,
    }
}

/// Lay out the Sunday-to-Saturday week containing `date`.
pub fn layout_week<S>(source: &S, date: NaiveDate, tz: Tz, state: &ViewState) -> WeekLayout
where
    S: EventSource + ?Sized,
{
    let start = week_start(date);
    let days = (0..DAYS_PER_WEEK)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|day| layout_day(source, day, tz, state))
        .collect();

    WeekLayout {
        week_start: start,
        days,
    }
}
