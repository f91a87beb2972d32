//! Time arithmetic shared by the segmenter, the packer and the views.
//!
//! Every interval in this crate is half-open: `[start, end)`. Two intervals
//! that merely touch (one ends exactly when the other starts) do not overlap.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Minutes in a nominal 24-hour day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Half-open interval overlap test: `a_start < b_end && b_start < a_end`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// The visible time window a layout pass is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// A 24-hour window beginning at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + Duration::hours(24),
        }
    }

    /// The calendar day `date` as seen in `tz`: from local midnight to the
    /// next local midnight.
    ///
    /// This is exactly 24 hours except on days with a DST transition, where
    /// the window follows the wall clock (23 or 25 hours).
    pub fn for_day(date: NaiveDate, tz: Tz) -> Self {
        let start = local_start_of_day(date, tz);
        let end = date
            .succ_opt()
            .map(|next| local_start_of_day(next, tz))
            .unwrap_or_else(|| start + Duration::hours(24));
        Self { start, end }
    }

    /// True when `instant` falls in `[start, end)`.
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// True when `[start, end)` intersects this window.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        overlaps(start, end, self.start, self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// First instant of `date` in `tz`.
///
/// Midnight can be skipped by a DST jump in a handful of zones; in that case
/// the first existing hour of the day is used. Ambiguous midnights resolve to
/// the earlier instant.
fn local_start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..4)
        .find_map(|hour| match tz.from_local_datetime(&(midnight + Duration::hours(hour))) {
            LocalResult::Single(t) => Some(t),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => None,
        })
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Format a calendar day as `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` day key. Malformed keys yield `None`.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

/// The calendar day `instant` falls on in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Wall-clock minutes elapsed since local midnight.
pub fn minutes_since_start_of_day(instant: DateTime<Utc>, tz: Tz) -> i64 {
    let local = instant.with_timezone(&tz);
    i64::from(local.hour()) * 60 + i64::from(local.minute())
}

/// Wall-clock minutes left until the next local midnight.
pub fn minutes_until_end_of_day(instant: DateTime<Utc>, tz: Tz) -> i64 {
    MINUTES_PER_DAY - minutes_since_start_of_day(instant, tz)
}

/// `a - b` in whole minutes, rounded to the nearest minute.
pub fn minutes_diff(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let millis = (a - b).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

/// The Sunday on or before `date`. Weeks start on Sunday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Parse an instant from a string.
///
/// Accepts RFC 3339 (e.g. `"2026-03-01T09:00:00.000Z"`) and naive datetimes
/// (`"2026-03-01T09:00:00"` or `"2026-03-01T09:00"`), which are read as UTC.
///
/// # Errors
/// Returns `LayoutError::MalformedInstant` when no format matches.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| LayoutError::MalformedInstant(s.to_string()))
}

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `LayoutError::InvalidTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| LayoutError::InvalidTimezone(name.to_string()))
}
