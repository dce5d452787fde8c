//! Classifies the page context the script woke up in.
//!
//! The same artifact is injected into every matched address: the watch page,
//! the chat document embedded in it, and the chat document opened as its own
//! window. Which components get wired depends entirely on this classification,
//! so it is computed exactly once at startup from the address and the window
//! nesting, and never re-evaluated mid-session.

use crate::consts::LIVE_CHAT_PATH_PREFIX;

/// Role of the current page context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRole {
    /// Live-chat document nested inside the watch page. Observes the chat
    /// list and relays entries to the parent window.
    EmbeddedFrame,
    /// Live-chat document opened as its own top-level window. Observes the
    /// chat list and renders locally; no relay involved.
    StandalonePopout,
    /// The watch page itself. Receives relayed entries and renders them.
    HostPage,
}

impl PageRole {
    /// Classifies from the page's pathname and whether the window is nested
    /// inside another navigable.
    #[must_use]
    pub fn classify(pathname: &str, nested: bool) -> PageRole {
        if pathname.starts_with(LIVE_CHAT_PATH_PREFIX) {
            if nested {
                PageRole::EmbeddedFrame
            } else {
                PageRole::StandalonePopout
            }
        } else {
            PageRole::HostPage
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
