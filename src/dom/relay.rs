//! Fire-and-forget delivery between page contexts.
//!
//! The sender half posts envelopes at the parent window; the receiver half
//! listens on its own window and forwards decoded entries. Neither side
//! acknowledges anything: see [`crate::envelope`] for the loss contract.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MessageEvent, Window};

use crate::dom::distinct_parent;
use crate::envelope::{self, EnvelopeError};
use crate::feed::ChatEntry;
use crate::sanitize;

/// Sender half, held by the embedded frame.
pub struct RelaySender {
    parent: Window,
}

impl RelaySender {
    /// `None` when the window has no distinct parent to post to.
    #[must_use]
    pub fn to_parent(window: &Window) -> Option<RelaySender> {
        distinct_parent(window).map(|parent| RelaySender { parent })
    }

    /// Broadcasts one entry to the parent. A parent without a listener
    /// loses the message silently; the backlog scan on the next page load
    /// is what makes up for it.
    pub fn send(&self, entry: &ChatEntry) {
        let json = match envelope::encode_entry(entry) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("envelope encode failed: {err}");
                return;
            }
        };
        let payload = match js_sys::JSON::parse(&json) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("envelope rejected by the page: {err:?}");
                return;
            }
        };
        if let Err(err) = self.parent.post_message(&payload, "*") {
            log::warn!("relay post failed: {err:?}");
        }
    }
}

/// Attaches the receiver half: every window message carrying the entry tag
/// is decoded, re-sanitized, and handed to `on_entry`. Anything else on the
/// channel is ignored without logging noise.
///
/// # Errors
///
/// Returns the DOM error when the message listener cannot be attached.
pub fn listen(
    window: &Window,
    mut on_entry: impl FnMut(ChatEntry) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let Some(json) = stringify(&event.data()) else {
            return;
        };
        match envelope::decode_entry(&json) {
            Ok(entry) => {
                // Any window able to post here could have forged the
                // envelope, so the fragment is cleaned again on arrival.
                let entry = ChatEntry {
                    message_html: sanitize::clean_fragment(&entry.message_html),
                    ..entry
                };
                on_entry(entry);
            }
            Err(EnvelopeError::ForeignTag(_)) => {}
            Err(EnvelopeError::Malformed(err)) => {
                log::debug!("ignoring non-envelope message: {err}");
            }
        }
    });
    window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn stringify(data: &JsValue) -> Option<String> {
    js_sys::JSON::stringify(data).map_or(None, |json| json.as_string())
}
