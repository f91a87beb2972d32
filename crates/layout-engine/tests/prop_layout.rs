//! Property-based tests for segmenting and packing using proptest.
//!
//! These check invariants that must hold for *any* set of events, not just
//! the hand-picked scenarios in `segment_tests.rs` and `pack_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use layout_engine::{pack, segment, Event, PositionedSegment, Segment};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

/// Events start anywhere in a three-day span and last 1 minute to 24 hours,
/// so plenty of them cross the edges of the middle day.
fn arb_event() -> impl Strategy<Value = (i64, i64)> {
    (0i64..3 * 24 * 60, 1i64..=24 * 60)
}

fn arb_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(arb_event(), 0..40).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (start, len))| {
                let start_at = base() + Duration::minutes(start);
                Event {
                    id: format!("evt-{:02}", i),
                    title: String::new(),
                    description: None,
                    start_at,
                    end_at: start_at + Duration::minutes(len),
                    created_at: base(),
                }
            })
            .collect()
    })
}

/// A window offset (in hours) into the three-day span.
fn arb_window_offset() -> impl Strategy<Value = i64> {
    0i64..48
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn window(offset_hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = base() + Duration::hours(offset_hours);
    (start, start + Duration::hours(24))
}

fn overlap(a: &Segment, b: &Segment) -> bool {
    a.clipped_start < b.clipped_end && b.clipped_start < a.clipped_end
}

/// Maximum number of segments active at once among `members`.
fn max_depth(members: &[&PositionedSegment]) -> usize {
    members
        .iter()
        .map(|p| {
            // Depth is maximal at some segment's start instant.
            let t = p.segment.clipped_start;
            members
                .iter()
                .filter(|q| q.segment.clipped_start <= t && t < q.segment.clipped_end)
                .count()
        })
        .max()
        .unwrap_or(0)
}

/// Split the packer's start-sorted output into clusters using the same
/// running-max-end rule the layout relies on.
fn clusters(placed: &[PositionedSegment]) -> Vec<Vec<&PositionedSegment>> {
    let mut out: Vec<Vec<&PositionedSegment>> = Vec::new();
    let mut running_end: Option<DateTime<Utc>> = None;
    for p in placed {
        match running_end {
            Some(end) if p.segment.clipped_start < end => {
                running_end = Some(end.max(p.segment.clipped_end));
                if let Some(last) = out.last_mut() {
                    last.push(p);
                }
            }
            _ => {
                running_end = Some(p.segment.clipped_end);
                out.push(vec![p]);
            }
        }
    }
    out
}

fn triples(placed: &[PositionedSegment]) -> Vec<(String, usize, usize)> {
    let mut t: Vec<_> = placed
        .iter()
        .map(|p| (p.event_id().to_string(), p.col_index, p.col_count))
        .collect();
    t.sort();
    t
}

// ---------------------------------------------------------------------------
// Segmenter properties
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn clipped_segments_stay_inside_window(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        for s in segment(&events, ws, we) {
            prop_assert!(ws <= s.clipped_start && s.clipped_start <= we);
            prop_assert!(ws <= s.clipped_end && s.clipped_end <= we);
            prop_assert!(s.clipped_start < s.clipped_end);
        }
    }

    #[test]
    fn continuation_flags_match_event_bounds(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        for s in segment(&events, ws, we) {
            prop_assert_eq!(s.continues_before, s.event.start_at < ws);
            prop_assert_eq!(s.continues_after, s.event.end_at > we);
        }
    }

    #[test]
    fn events_outside_window_never_produce_segments(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        let segments = segment(&events, ws, we);
        for e in &events {
            let included = segments.iter().any(|s| s.event.id == e.id);
            if e.end_at <= ws || e.start_at >= we {
                prop_assert!(!included, "event {} outside window was included", e.id);
            } else {
                prop_assert!(included, "event {} inside window was dropped", e.id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Packer properties
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn one_output_per_input_and_col_index_below_count(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        let segments = segment(&events, ws, we);
        let n = segments.len();
        let placed = pack(segments);

        prop_assert_eq!(placed.len(), n);
        for p in &placed {
            prop_assert!(p.col_count >= 1);
            prop_assert!(p.col_index < p.col_count);
        }
    }

    #[test]
    fn same_column_never_overlaps(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        let placed = pack(segment(&events, ws, we));

        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                if a.col_index == b.col_index {
                    prop_assert!(
                        !overlap(&a.segment, &b.segment),
                        "{} and {} share column {} but overlap",
                        a.event_id(),
                        b.event_id(),
                        a.col_index
                    );
                }
            }
        }
    }

    #[test]
    fn column_count_equals_max_overlap_depth(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        let placed = pack(segment(&events, ws, we));

        for cluster in clusters(&placed) {
            let count = cluster[0].col_count;
            prop_assert!(cluster.iter().all(|p| p.col_count == count));

            let used = cluster.iter().map(|p| p.col_index).max().map_or(0, |m| m + 1);
            prop_assert_eq!(used, count);
            prop_assert_eq!(count, max_depth(&cluster));
        }
    }

    #[test]
    fn packing_ignores_input_order(events in arb_events(), offset in arb_window_offset()) {
        let (ws, we) = window(offset);
        let segments = segment(&events, ws, we);
        let mut reversed = segments.clone();
        reversed.reverse();

        let first = pack(segments.clone());
        let again = pack(segments);
        let flipped = pack(reversed);

        prop_assert_eq!(&first, &again);
        prop_assert_eq!(triples(&first), triples(&flipped));
    }
}
