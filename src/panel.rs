//! Panel state, preferences, and resize geometry.
//!
//! The DOM half of the panel lives in [`crate::dom::panel_host`]; this module
//! holds everything that can be decided without a document: which rows exist
//! and in what order, whether the body is visible, how a drag maps pointer
//! positions to heights, and how preferences round-trip through storage.

use crate::consts::{
    DEFAULT_PANEL_HEIGHT_PX, ENABLED_KEY, HEIGHT_KEY, MAX_HEIGHT_VIEWPORT_FRACTION,
    MIN_PANEL_HEIGHT_PX,
};
use crate::feed::ChatEntry;

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;

/// Synchronous key-value store for the preference pair.
///
/// Backed by origin-scoped browser storage in production and by a map in
/// tests. Writes are fire-and-forget; a store that cannot persist simply
/// loses the preference.
pub trait PrefsStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// User-facing panel preferences plus the per-load collapse flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelState {
    /// Whether rows are shown. Persisted.
    pub enabled: bool,
    /// Body height. Persisted, clamped whenever a viewport is known.
    pub height_px: i32,
    /// Header collapse. Deliberately not persisted; every load starts open.
    pub collapsed: bool,
}

impl Default for PanelState {
    fn default() -> PanelState {
        PanelState {
            enabled: true,
            height_px: DEFAULT_PANEL_HEIGHT_PX,
            collapsed: false,
        }
    }
}

impl PanelState {
    /// Reads the persisted preferences, falling back to defaults for absent
    /// or unparseable values. Anything but a literal `"false"` counts as
    /// enabled. Heights below the minimum are raised to it.
    #[must_use]
    pub fn load(store: &dyn PrefsStore) -> PanelState {
        let enabled = store.read(ENABLED_KEY).as_deref() != Some("false");
        let height_px = store
            .read(HEIGHT_KEY)
            .map_or(DEFAULT_PANEL_HEIGHT_PX, |raw| {
                raw.parse().unwrap_or(DEFAULT_PANEL_HEIGHT_PX)
            })
            .max(MIN_PANEL_HEIGHT_PX);
        PanelState {
            enabled,
            height_px,
            collapsed: false,
        }
    }

    /// Flips visibility and persists the new flag.
    pub fn set_enabled(&mut self, enabled: bool, store: &dyn PrefsStore) {
        self.enabled = enabled;
        store.write(ENABLED_KEY, if enabled { "true" } else { "false" });
    }

    /// Collapse is session-only; no write happens here.
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Clamps and persists the height a finished drag arrived at.
    pub fn commit_height(&mut self, requested: i32, viewport_height: f64, store: &dyn PrefsStore) {
        self.height_px = clamp_height(requested, viewport_height);
        store.write(HEIGHT_KEY, &self.height_px.to_string());
    }

    /// The body renders only when enabled and not collapsed.
    #[must_use]
    pub fn body_visible(&self) -> bool {
        self.enabled && !self.collapsed
    }
}

/// Clamps a requested height to [80, 80% of the viewport]. On viewports too
/// small to honor both bounds the minimum wins, keeping the panel usable.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn clamp_height(requested: i32, viewport_height: f64) -> i32 {
    let cap = (viewport_height * MAX_HEIGHT_VIEWPORT_FRACTION) as i32;
    requested.min(cap).max(MIN_PANEL_HEIGHT_PX)
}

/// One resize drag, anchored at the pointer position where it began.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    start_y: f64,
    start_height: i32,
}

impl DragSession {
    #[must_use]
    pub fn new(start_y: f64, start_height: i32) -> DragSession {
        DragSession {
            start_y,
            start_height,
        }
    }

    /// Height the panel should show with the pointer at `pointer_y`. The
    /// handle sits on the bottom edge, so dragging down grows the panel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn height_at(&self, pointer_y: f64, viewport_height: f64) -> i32 {
        let delta = (pointer_y - self.start_y) as i32;
        clamp_height(self.start_height + delta, viewport_height)
    }
}

/// Append-only log of rendered entries plus the panel state.
///
/// Rows are never reordered, capped, or evicted; outliving the host widget's
/// own truncation is the point of the panel. Ingestion does not consult
/// visibility, so disabling the panel only hides what keeps accumulating.
#[derive(Debug)]
pub struct PanelCore {
    pub state: PanelState,
    rows: Vec<ChatEntry>,
}

impl PanelCore {
    #[must_use]
    pub fn new(state: PanelState) -> PanelCore {
        PanelCore {
            state,
            rows: Vec::new(),
        }
    }

    /// Appends an entry, returning its row index.
    pub fn push(&mut self, entry: ChatEntry) -> usize {
        self.rows.push(entry);
        self.rows.len() - 1
    }

    /// All rows in arrival order.
    #[must_use]
    pub fn rows(&self) -> &[ChatEntry] {
        &self.rows
    }
}
