//! Detects the page's own address changes.
//!
//! The host site swaps content in place instead of reloading, so injected
//! elements can vanish while the script keeps running. Watching the body for
//! mutations and comparing the address on each burst catches those swaps
//! without hooking the history API.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{MutationObserver, MutationObserverInit, Window};

use crate::consts::NAV_SETTLE_MS;

/// Watches for single-page navigations. `on_navigate` runs after each
/// detected address change, once the page has had [`NAV_SETTLE_MS`] to
/// rebuild its layout.
///
/// # Errors
///
/// Returns the DOM error when the document has no body yet or the observer
/// cannot attach.
pub fn watch(window: &Window, on_navigate: impl Fn() + 'static) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let location = window.location();
    let last_href = Rc::new(RefCell::new(location.href().unwrap_or_default()));
    let settled = Rc::new(on_navigate);

    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |_records: Array, _observer: MutationObserver| {
            let current = location.href().unwrap_or_default();
            let mut last = last_href.borrow_mut();
            if *last == current {
                return;
            }
            last.clone_from(&current);
            log::info!("navigation detected: {current}");
            let settled = Rc::clone(&settled);
            Timeout::new(NAV_SETTLE_MS, move || (*settled)()).forget();
        },
    );
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&body, &options)?;
    callback.forget();
    Ok(())
}
