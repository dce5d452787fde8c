//! Entry wiring, one arrangement per page context.
//!
//! Classification happens exactly once, at injection. The embedded frame
//! only sends; the host page only receives and renders; the standalone
//! popout does both ends locally with no relay in between.

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Window};

use crate::context::PageRole;
use crate::dom::panel_host::{PanelHost, Placement};
use crate::dom::relay::RelaySender;
use crate::dom::source::ChatDomSource;
use crate::dom::{self, navigate, observe, relay};

/// Classifies the running context and wires the pieces it needs. Runs once,
/// as soon as the wasm module instantiates; a failure logs and leaves the
/// page as it was.
#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // An earlier injection pass already installed a logger.
        log::debug!("logger already installed, keeping the existing one");
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let pathname = window.location().pathname().unwrap_or_default();
    let nested = dom::distinct_parent(&window).is_some();
    let role = PageRole::classify(&pathname, nested);
    log::info!("starting as {role:?} on {pathname}");
    let wired = match role {
        PageRole::EmbeddedFrame => wire_embedded_frame(&window),
        PageRole::StandalonePopout => wire_popout(&window),
        PageRole::HostPage => wire_host_page(&window),
    };
    if let Err(err) = wired {
        log::warn!("wiring failed: {err:?}");
    }
}

fn wire_embedded_frame(window: &Window) -> Result<(), JsValue> {
    let document = page_document(window)?;
    let Some(sender) = RelaySender::to_parent(window) else {
        return Err(JsValue::from_str("embedded frame has no parent window"));
    };
    // The container search runs until the widget appears; nothing here ever
    // wants to stop it early.
    let _token = observe::start(ChatDomSource::new(document), move |entry| sender.send(&entry));
    Ok(())
}

fn wire_popout(window: &Window) -> Result<(), JsValue> {
    let document = page_document(window)?;
    let panel = PanelHost::new(window, &document, Placement::PopoutListHead);
    panel.schedule_mount();
    let sink = panel.clone();
    let _token = observe::start(ChatDomSource::new(document), move |entry| sink.push(entry));
    Ok(())
}

fn wire_host_page(window: &Window) -> Result<(), JsValue> {
    let document = page_document(window)?;
    let panel = PanelHost::new(window, &document, Placement::BeforeHostWidget);
    panel.schedule_mount();
    let sink = panel.clone();
    relay::listen(window, move |entry| sink.push(entry))?;
    let remount = panel.clone();
    navigate::watch(window, move || remount.schedule_mount())?;
    Ok(())
}

fn page_document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}
