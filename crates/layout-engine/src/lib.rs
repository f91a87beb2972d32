//! # layout-engine
//!
//! Deterministic overlap layout for calendar day and week views.
//!
//! Given events and a visible window, the engine clips each event to the
//! window and packs the resulting segments into side-by-side columns so that
//! overlapping events never collide. Both steps are pure functions: no I/O,
//! no shared state, safe to call on every render.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use layout_engine::{pack, segment, Event};
//!
//! let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap();
//! let event = |id: &str, start, end| Event {
//!     id: id.to_string(),
//!     title: id.to_string(),
//!     description: None,
//!     start_at: start,
//!     end_at: end,
//!     created_at: start,
//! };
//!
//! let events = vec![event("a", at(9, 0), at(10, 0)), event("b", at(9, 30), at(10, 30))];
//! let day_start = at(0, 0);
//! let day_end = day_start + chrono::Duration::hours(24);
//!
//! let placed = pack(segment(&events, day_start, day_end));
//! assert_eq!(placed[0].col_index, 0);
//! assert_eq!(placed[1].col_index, 1);
//! assert!(placed.iter().all(|p| p.col_count == 2));
//! ```
//!
//! ## Modules
//!
//! - [`segment`] — clip events to a window, flag continuation across edges
//! - [`pack`] — cluster overlapping segments and assign columns
//! - [`time`] — windows, day keys, minute arithmetic, instant parsing
//! - [`event`] — event model, drafts, validation, record ingestion
//! - [`store`] — `EventSource` queries and the in-memory store
//! - [`view`] — day and week layouts
//! - [`color`] — stable palette index per event id
//! - [`error`] — Error types

pub mod color;
pub mod error;
pub mod event;
pub mod pack;
pub mod segment;
pub mod store;
pub mod time;
pub mod view;

pub use color::{event_color, palette_index};
pub use error::LayoutError;
pub use event::{ingest, Event, EventDraft, EventRecord};
pub use pack::{pack, PositionedSegment};
pub use segment::{segment, Segment};
pub use store::{EventSource, InMemoryEventStore};
pub use time::Window;
pub use view::{layout_day, layout_week, DayLayout, ViewState, WeekLayout};
