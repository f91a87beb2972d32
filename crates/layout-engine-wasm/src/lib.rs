//! WASM bindings for layout-engine.
//!
//! Exposes day and week layout, month day markers and event colours to
//! JavaScript via `wasm-bindgen`. Events cross the boundary as JSON arrays of
//! records (`{id, title, description?, startAt, endAt, createdAt?}`) with ISO
//! 8601 timestamps; results come back as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p layout-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/layout-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/layout_engine_wasm.wasm
//! ```

use chrono::Datelike;
use chrono_tz::Tz;
use layout_engine::time::{day_key, parse_day_key, parse_timezone};
use layout_engine::{EventRecord, InMemoryEventStore, ViewState};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers shared by the exports. They return plain `String` errors so they
// can be exercised off-wasm; the exports convert them to `JsValue`.
// ---------------------------------------------------------------------------

fn load_store(events_json: &str, tz: Tz) -> Result<InMemoryEventStore, String> {
    let records: Vec<EventRecord> =
        serde_json::from_str(events_json).map_err(|e| format!("Invalid events JSON: {}", e))?;
    Ok(InMemoryEventStore::from_records(tz, &records))
}

fn resolve(day: &str, timezone: &str) -> Result<(chrono::NaiveDate, Tz), String> {
    let date = parse_day_key(day).ok_or_else(|| format!("Invalid day key '{}'", day))?;
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    Ok((date, tz))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn layout_day_json(
    events_json: &str,
    day: &str,
    timezone: &str,
    boxes: bool,
) -> Result<String, String> {
    let (date, tz) = resolve(day, timezone)?;
    let store = load_store(events_json, tz)?;
    let layout = layout_engine::layout_day(&store, date, tz, &ViewState::ready());
    if boxes {
        to_json(&layout.boxes())
    } else {
        to_json(&layout)
    }
}

fn layout_week_json(events_json: &str, day: &str, timezone: &str) -> Result<String, String> {
    let (date, tz) = resolve(day, timezone)?;
    let store = load_store(events_json, tz)?;
    to_json(&layout_engine::layout_week(
        &store,
        date,
        tz,
        &ViewState::ready(),
    ))
}

fn month_days_json(events_json: &str, month_day: &str, timezone: &str) -> Result<String, String> {
    let (date, tz) = resolve(month_day, timezone)?;
    let store = load_store(events_json, tz)?;
    let days: Vec<String> = store
        .days_with_events_in_month(date.year(), date.month())
        .into_iter()
        .map(day_key)
        .collect();
    to_json(&days)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Lay out one calendar day.
///
/// # Arguments
/// - `events_json` -- JSON array of event records
/// - `day` -- Day key (e.g., "2026-03-04")
/// - `timezone` -- IANA timezone that defines the calendar day
///
/// Returns the day layout as JSON: `{date, window, segments: [...]}`, where
/// each segment carries `colIndex` and `colCount`.
#[wasm_bindgen(js_name = "layoutDay")]
pub fn layout_day(events_json: &str, day: &str, timezone: &str) -> Result<String, JsValue> {
    layout_day_json(events_json, day, timezone, false).map_err(|e| JsValue::from_str(&e))
}

/// Lay out one calendar day as drawable boxes.
///
/// Returns a JSON array of `{eventId, title, startMinute, durationMinutes,
/// colIndex, colCount, continuesBefore, continuesAfter, color}`.
#[wasm_bindgen(js_name = "layoutDayBoxes")]
pub fn layout_day_boxes(events_json: &str, day: &str, timezone: &str) -> Result<String, JsValue> {
    layout_day_json(events_json, day, timezone, true).map_err(|e| JsValue::from_str(&e))
}

/// Lay out the Sunday-to-Saturday week containing `day`.
#[wasm_bindgen(js_name = "layoutWeek")]
pub fn layout_week(events_json: &str, day: &str, timezone: &str) -> Result<String, JsValue> {
    layout_week_json(events_json, day, timezone).map_err(|e| JsValue::from_str(&e))
}

/// Day keys of the month containing `day` on which at least one event starts.
#[wasm_bindgen(js_name = "daysWithEventsInMonth")]
pub fn days_with_events_in_month(
    events_json: &str,
    day: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    month_days_json(events_json, day, timezone).map_err(|e| JsValue::from_str(&e))
}

/// Palette index for an event id.
#[wasm_bindgen(js_name = "eventColorIndex")]
pub fn event_color_index(event_id: &str, palette_len: usize) -> usize {
    layout_engine::palette_index(event_id, palette_len)
}
