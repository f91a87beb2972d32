//! Tests for clipping events to a day window.

use chrono::{DateTime, Duration, TimeZone, Utc};
use layout_engine::segment::Segment;
use layout_engine::{segment, Event, Window};

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

fn event(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Event {}", id),
        description: None,
        start_at: start,
        end_at: end,
        created_at: start,
    }
}

/// The window for 2026-03-`day`, midnight to midnight UTC.
fn day(day: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at(day, 0, 0);
    (start, start + Duration::hours(24))
}

#[test]
fn event_inside_window_is_unchanged() {
    let (ws, we) = day(1);
    let segments = segment(&[event("a", at(1, 9, 0), at(1, 10, 0))], ws, we);

    assert_eq!(segments.len(), 1);
    let s = &segments[0];
    assert_eq!(s.clipped_start, at(1, 9, 0));
    assert_eq!(s.clipped_end, at(1, 10, 0));
    assert!(!s.continues_before);
    assert!(!s.continues_after);
    assert_eq!(s.event.id, "a");
}

#[test]
fn event_spanning_midnight_is_split_across_days() {
    // 22:00 on the 1st to 02:00 on the 2nd.
    let events = [event("late", at(1, 22, 0), at(2, 2, 0))];

    let (ws, we) = day(1);
    let first = segment(&events, ws, we);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].clipped_start, at(1, 22, 0));
    assert_eq!(first[0].clipped_end, at(2, 0, 0));
    assert!(!first[0].continues_before);
    assert!(first[0].continues_after);

    let (ws, we) = day(2);
    let second = segment(&events, ws, we);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].clipped_start, at(2, 0, 0));
    assert_eq!(second[0].clipped_end, at(2, 2, 0));
    assert!(second[0].continues_before);
    assert!(!second[0].continues_after);
}

#[test]
fn event_covering_whole_window_continues_both_ways() {
    let (ws, we) = day(2);
    let segments = segment(&[event("long", at(1, 12, 0), at(3, 12, 0))], ws, we);

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].clipped_start, ws);
    assert_eq!(segments[0].clipped_end, we);
    assert!(segments[0].continues_before);
    assert!(segments[0].continues_after);
}

#[test]
fn event_ending_exactly_at_window_start_is_excluded() {
    let (ws, we) = day(2);
    let segments = segment(&[event("prev", at(1, 22, 0), at(2, 0, 0))], ws, we);
    assert!(segments.is_empty(), "touching the start edge is not an overlap");
}

#[test]
fn event_starting_exactly_at_window_end_is_excluded() {
    let (ws, we) = day(1);
    let segments = segment(&[event("next", at(2, 0, 0), at(2, 1, 0))], ws, we);
    assert!(segments.is_empty(), "touching the end edge is not an overlap");
}

#[test]
fn event_ending_at_window_end_does_not_continue() {
    let (ws, we) = day(1);
    let segments = segment(&[event("eod", at(1, 23, 0), at(2, 0, 0))], ws, we);

    assert_eq!(segments.len(), 1);
    assert!(!segments[0].continues_after);
    assert_eq!(segments[0].clipped_end, we);
}

#[test]
fn inverted_and_empty_events_are_dropped() {
    let (ws, we) = day(1);
    let events = [
        event("inverted", at(1, 10, 0), at(1, 9, 0)),
        event("empty", at(1, 10, 0), at(1, 10, 0)),
        event("ok", at(1, 11, 0), at(1, 12, 0)),
    ];

    let segments = segment(&events, ws, we);

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].event.id, "ok");
}

#[test]
fn events_on_other_days_are_ignored() {
    let (ws, we) = day(5);
    let events = [
        event("before", at(3, 9, 0), at(3, 10, 0)),
        event("after", at(7, 9, 0), at(7, 10, 0)),
    ];
    assert!(segment(&events, ws, we).is_empty());
}

#[test]
fn empty_input_yields_no_segments() {
    let (ws, we) = day(1);
    assert!(segment(&[], ws, we).is_empty());
}

#[test]
fn clip_reports_degenerate_interval() {
    let window = Window::new(at(1, 0, 0));
    let outside = event("outside", at(3, 9, 0), at(3, 10, 0));

    let err = Segment::clip(&outside, &window).unwrap_err();
    assert!(
        err.to_string().starts_with("Degenerate interval"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn segment_duration_is_clipped_duration() {
    let (ws, we) = day(1);
    let segments = segment(&[event("late", at(1, 23, 0), at(2, 1, 30))], ws, we);
    assert_eq!(segments[0].duration_minutes(), 60);
}
