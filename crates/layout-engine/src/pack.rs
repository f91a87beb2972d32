//! Assign side-by-side columns to overlapping segments of one day.
//!
//! Segments are sorted by start time and swept once to split them into
//! clusters: runs in which every segment starts before the running maximum
//! end of the run so far. Clusters are the connected components of the
//! overlap graph along the time axis.
//!
//! Within a cluster each segment goes into the first column whose last
//! segment it does not overlap, or into a new column. Processed in start
//! order this greedy colouring is optimal for interval graphs: the column
//! count equals the maximum number of simultaneously active segments.

use std::cmp::Ordering;
use std::ops::Range;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::segment::Segment;
use crate::time::{minutes_since_start_of_day, minutes_until_end_of_day, overlaps};

/// Shortest duration a box is drawn with, in minutes.
pub const MIN_DISPLAY_MINUTES: i64 = 15;

/// A segment with its column within its overlap cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedSegment {
    #[serde(flatten)]
    pub segment: Segment,
    /// 0-based column within the cluster. Always `< col_count`.
    pub col_index: usize,
    /// Number of columns the cluster uses. Always `>= 1`.
    pub col_count: usize,
}

impl PositionedSegment {
    pub fn event_id(&self) -> &str {
        &self.segment.event.id
    }

    /// Wall-clock minutes from local midnight in `tz` to the clipped start.
    ///
    /// On DST transition days this is the position on a 24-hour grid, not
    /// the time elapsed since the window opened.
    pub fn start_minute(&self, tz: Tz) -> i64 {
        minutes_since_start_of_day(self.segment.clipped_start, tz)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.segment.duration_minutes()
    }

    /// Duration used for drawing: short events still get a readable box,
    /// but no box runs past the bottom of the day grid.
    pub fn display_duration_minutes(&self, tz: Tz) -> i64 {
        self.duration_minutes()
            .max(MIN_DISPLAY_MINUTES)
            .min(minutes_until_end_of_day(self.segment.clipped_start, tz))
    }

    /// Horizontal placement as `(left, width)` fractions of the day column.
    pub fn column_span(&self) -> (f64, f64) {
        let width = 1.0 / self.col_count.max(1) as f64;
        (self.col_index as f64 * width, width)
    }
}

/// Order used for the sweep: start, then end, then event id.
///
/// The secondary keys make the result independent of input order; the sort
/// is stable so exact duplicates keep their relative order.
fn sweep_order(a: &Segment, b: &Segment) -> Ordering {
    a.clipped_start
        .cmp(&b.clipped_start)
        .then_with(|| a.clipped_end.cmp(&b.clipped_end))
        .then_with(|| a.event.id.cmp(&b.event.id))
}

/// Split start-sorted segments into overlap clusters.
fn cluster_bounds(sorted: &[Segment]) -> Vec<Range<usize>> {
    let mut bounds = Vec::new();
    let mut cluster_start = 0;
    let mut running_end: Option<DateTime<Utc>> = None;

    for (i, seg) in sorted.iter().enumerate() {
        match running_end {
            Some(end) if seg.clipped_start < end => {
                running_end = Some(end.max(seg.clipped_end));
            }
            Some(_) => {
                bounds.push(cluster_start..i);
                cluster_start = i;
                running_end = Some(seg.clipped_end);
            }
            None => running_end = Some(seg.clipped_end),
        }
    }

    if !sorted.is_empty() {
        bounds.push(cluster_start..sorted.len());
    }
    bounds
}

/// Greedy column assignment for one start-sorted cluster.
///
/// Returns one column index per segment plus the number of columns used.
fn assign_columns(cluster: &[Segment]) -> (Vec<usize>, usize) {
    // (start, end) of the last segment placed in each column.
    let mut columns: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    let mut indices = Vec::with_capacity(cluster.len());

    for seg in cluster {
        let free = columns.iter().position(|&(start, end)| {
            !overlaps(start, end, seg.clipped_start, seg.clipped_end)
        });
        let col = match free {
            Some(col) => {
                columns[col] = (seg.clipped_start, seg.clipped_end);
                col
            }
            None => {
                columns.push((seg.clipped_start, seg.clipped_end));
                columns.len() - 1
            }
        };
        indices.push(col);
    }

    (indices, columns.len().max(1))
}

/// Assign a column and column count to every segment.
///
/// Input order does not matter; the output is sorted by clipped start (then
/// end, then event id). Degenerate segments are dropped.
pub fn pack(mut segments: Vec<Segment>) -> Vec<PositionedSegment> {
    segments.retain(|s| {
        let ok = s.clipped_start < s.clipped_end;
        if !ok {
            debug!(event_id = %s.event.id, "dropping degenerate segment before packing");
        }
        ok
    });
    segments.sort_by(sweep_order);

    let mut col_of = vec![0usize; segments.len()];
    let mut count_of = vec![1usize; segments.len()];
    for range in cluster_bounds(&segments) {
        let (indices, col_count) = assign_columns(&segments[range.clone()]);
        for (offset, col) in indices.into_iter().enumerate() {
            col_of[range.start + offset] = col;
            count_of[range.start + offset] = col_count;
        }
    }

    segments
        .into_iter()
        .zip(col_of.into_iter().zip(count_of))
        .map(|(segment, (col_index, col_count))| PositionedSegment {
            segment,
            col_index,
            col_count,
        })
        .collect()
}
