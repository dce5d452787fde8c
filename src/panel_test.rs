use std::cell::RefCell;
use std::collections::HashMap;

use super::*;

#[derive(Default)]
struct MemoryPrefs {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryPrefs {
    fn with(key: &str, value: &str) -> MemoryPrefs {
        let prefs = MemoryPrefs::default();
        prefs.write(key, value);
        prefs
    }

    fn snapshot(&self) -> HashMap<String, String> {
        self.values.borrow().clone()
    }
}

impl PrefsStore for MemoryPrefs {
    fn read(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

fn entry(text: &str) -> ChatEntry {
    ChatEntry {
        author_name: "Streamer".to_string(),
        message_html: text.to_string(),
        message_text: text.to_string(),
        timestamp: "1:02 PM".to_string(),
        author_photo_url: String::new(),
    }
}

// ── Loading preferences ─────────────────────────────────────────

#[test]
fn empty_store_loads_defaults() {
    let state = PanelState::load(&MemoryPrefs::default());
    assert_eq!(state, PanelState::default());
    assert!(state.enabled);
    assert_eq!(state.height_px, 300);
    assert!(!state.collapsed);
}

#[test]
fn stored_false_disables_the_panel() {
    let state = PanelState::load(&MemoryPrefs::with("panel.enabled", "false"));
    assert!(!state.enabled);
}

#[test]
fn anything_but_false_counts_as_enabled() {
    for value in ["true", "yes", "", "FALSE"] {
        let state = PanelState::load(&MemoryPrefs::with("panel.enabled", value));
        assert!(state.enabled, "{value:?} should load as enabled");
    }
}

#[test]
fn persisted_height_wins_over_the_default() {
    let state = PanelState::load(&MemoryPrefs::with("panel.height", "450"));
    assert_eq!(state.height_px, 450);
}

#[test]
fn unparseable_height_falls_back_to_default() {
    let state = PanelState::load(&MemoryPrefs::with("panel.height", "tall"));
    assert_eq!(state.height_px, 300);
}

#[test]
fn undersized_stored_height_is_raised_to_the_minimum() {
    for value in ["40", "-20", "0"] {
        let state = PanelState::load(&MemoryPrefs::with("panel.height", value));
        assert_eq!(state.height_px, 80, "stored {value:?}");
    }
}

// ── Persisting changes ──────────────────────────────────────────

#[test]
fn toggling_enabled_persists_the_flag() {
    let prefs = MemoryPrefs::default();
    let mut state = PanelState::load(&prefs);
    state.set_enabled(false, &prefs);
    assert_eq!(prefs.read("panel.enabled").as_deref(), Some("false"));
    state.set_enabled(true, &prefs);
    assert_eq!(prefs.read("panel.enabled").as_deref(), Some("true"));
}

#[test]
fn committed_height_is_clamped_then_persisted() {
    let prefs = MemoryPrefs::default();
    let mut state = PanelState::default();
    state.commit_height(500, 1000.0, &prefs);
    assert_eq!(state.height_px, 500);
    assert_eq!(prefs.read("panel.height").as_deref(), Some("500"));

    state.commit_height(50, 1000.0, &prefs);
    assert_eq!(state.height_px, 80);
    assert_eq!(prefs.read("panel.height").as_deref(), Some("80"));

    state.commit_height(2000, 1000.0, &prefs);
    assert_eq!(state.height_px, 800);
    assert_eq!(prefs.read("panel.height").as_deref(), Some("800"));
}

#[test]
fn collapse_is_session_only() {
    let prefs = MemoryPrefs::default();
    let mut state = PanelState::load(&prefs);
    let before = prefs.snapshot();
    state.toggle_collapsed();
    assert!(state.collapsed);
    assert_eq!(prefs.snapshot(), before, "collapse must not touch storage");

    // A fresh load starts open again.
    assert!(!PanelState::load(&prefs).collapsed);
}

// ── Visibility ──────────────────────────────────────────────────

#[test]
fn body_is_visible_only_when_enabled_and_open() {
    let mut state = PanelState::default();
    assert!(state.body_visible());
    state.toggle_collapsed();
    assert!(!state.body_visible());
    state.toggle_collapsed();
    state.enabled = false;
    assert!(!state.body_visible());
}

// ── Height clamping ─────────────────────────────────────────────

#[test]
fn clamp_passes_heights_inside_the_bounds() {
    assert_eq!(clamp_height(300, 1000.0), 300);
    assert_eq!(clamp_height(80, 1000.0), 80);
    assert_eq!(clamp_height(800, 1000.0), 800);
}

#[test]
fn clamp_raises_small_heights() {
    assert_eq!(clamp_height(20, 1000.0), 80);
    assert_eq!(clamp_height(-300, 1000.0), 80);
}

#[test]
fn clamp_caps_at_the_viewport_fraction() {
    assert_eq!(clamp_height(900, 1000.0), 800);
    assert_eq!(clamp_height(5000, 600.0), 480);
}

#[test]
fn minimum_wins_on_degenerate_viewports() {
    assert_eq!(clamp_height(300, 50.0), 80);
    assert_eq!(clamp_height(10, 0.0), 80);
}

// ── Drag sessions ───────────────────────────────────────────────

#[test]
fn dragging_down_grows_the_panel() {
    let drag = DragSession::new(100.0, 300);
    assert_eq!(drag.height_at(150.0, 1000.0), 350);
}

#[test]
fn dragging_up_shrinks_the_panel() {
    let drag = DragSession::new(100.0, 300);
    assert_eq!(drag.height_at(20.0, 1000.0), 220);
}

#[test]
fn drag_heights_are_clamped_live() {
    let drag = DragSession::new(100.0, 300);
    assert_eq!(drag.height_at(-900.0, 1000.0), 80);
    assert_eq!(drag.height_at(5000.0, 1000.0), 800);
}

// ── Row log ─────────────────────────────────────────────────────

#[test]
fn rows_append_in_arrival_order() {
    let mut core = PanelCore::new(PanelState::default());
    assert_eq!(core.push(entry("one")), 0);
    assert_eq!(core.push(entry("two")), 1);
    assert_eq!(core.push(entry("three")), 2);
    let texts: Vec<&str> = core.rows().iter().map(|e| e.message_text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn disabled_panel_still_accumulates_rows() {
    let prefs = MemoryPrefs::default();
    let mut core = PanelCore::new(PanelState::default());
    core.state.set_enabled(false, &prefs);
    assert!(!core.state.body_visible());

    core.push(entry("while hidden"));
    core.push(entry("still hidden"));
    assert_eq!(core.rows().len(), 2);

    // Re-enabling reveals what accumulated; nothing was dropped.
    core.state.set_enabled(true, &prefs);
    assert!(core.state.body_visible());
    assert_eq!(core.rows()[0].message_text, "while hidden");
}
