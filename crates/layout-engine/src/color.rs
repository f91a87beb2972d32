//! Stable per-event colours.

use serde::Serialize;

/// A palette entry: a symbolic name and a translucent CSS background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventColor {
    pub name: &'static str,
    pub css: &'static str,
}

pub const EVENT_PALETTE: [EventColor; 5] = [
    EventColor {
        name: "sky",
        css: "rgba(56, 189, 248, 0.4)",
    },
    EventColor {
        name: "blue",
        css: "rgba(37, 99, 235, 0.4)",
    },
    EventColor {
        name: "indigo",
        css: "rgba(99, 102, 241, 0.4)",
    },
    EventColor {
        name: "violet",
        css: "rgba(139, 92, 246, 0.4)",
    },
    EventColor {
        name: "emerald",
        css: "rgba(16, 185, 129, 0.4)",
    },
];

/// Map an event id onto `0..palette_len`.
///
/// The hash is the sum of the id's UTF-16 code units, so an id keeps its
/// colour across sessions and platforms. Returns 0 for an empty palette.
pub fn palette_index(id: &str, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    let sum: u64 = id.encode_utf16().map(u64::from).sum();
    (sum % palette_len as u64) as usize
}

pub fn event_color(id: &str) -> EventColor {
    EVENT_PALETTE[palette_index(id, EVENT_PALETTE.len())]
}
