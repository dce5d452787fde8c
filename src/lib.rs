//! Streamer-message dock for live chat pages.
//!
//! This crate is compiled to WebAssembly and injected into the video site's
//! pages. It watches the live chat widget for messages posted by the channel
//! owner, relays them out of the chat frame when one is in the way, and pins
//! them in a resizable panel above the chat so they cannot scroll out of
//! reach. Classification of the running page, extraction, sanitization, and
//! panel sizing are all pure and tested natively; only the thin shells under
//! [`dom`] touch the browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`boot`] | Entry point and per-context wiring |
//! | [`context`] | Page role classification |
//! | [`feed`] | Candidate filtering, dedupe, and the [`feed::EntrySource`] seam |
//! | [`sanitize`] | HTML fragment cleaning |
//! | [`envelope`] | The relay wire format |
//! | [`panel`] | Panel state, sizing, and preference logic |
//! | [`retry`] | Cancellable fixed-interval retry tasks |
//! | [`dom`] | Browser shells: source adapter, observer, relay, panel, storage, trusted markup |
//! | [`consts`] | Selectors, storage keys, and tuning constants |

pub mod boot;
pub mod consts;
pub mod context;
pub mod dom;
pub mod envelope;
pub mod feed;
pub mod panel;
pub mod retry;
pub mod sanitize;
