//! Browser side of the pipeline.
//!
//! Everything that touches web-sys lives under this module: the source
//! adapter over the live chat widget, the mutation-observer wiring, the
//! postMessage relay, preference storage, the injected panel, the
//! trusted-markup shim, and the navigation watcher. The pure halves these
//! shells drive live at the crate root and never see a document.

pub mod navigate;
pub mod observe;
pub mod panel_host;
pub mod prefs;
pub mod relay;
pub mod source;
pub mod trust;

use web_sys::Window;

/// Display time used when an entry carries no timestamp of its own.
#[must_use]
pub fn wall_clock_time() -> String {
    js_sys::Date::new_0().to_locale_time_string("en-US").into()
}

/// The parent window, when one exists and is not the window itself.
#[must_use]
pub fn distinct_parent(window: &Window) -> Option<Window> {
    match window.parent() {
        Ok(Some(parent)) if !js_sys::Object::is(parent.as_ref(), window.as_ref()) => Some(parent),
        _ => None,
    }
}
