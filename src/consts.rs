//! Fixed selectors, storage keys, and tuning constants shared across the crate.

// ── Addresses ───────────────────────────────────────────────────

/// Pathname prefix of the live-chat document (also matches the replay variant).
pub const LIVE_CHAT_PATH_PREFIX: &str = "/live_chat";

// ── Chat widget structure ───────────────────────────────────────

/// Live container that receives newly inserted chat entry nodes.
pub const CHAT_CONTAINER_SELECTOR: &str = "yt-live-chat-item-list-renderer #items";

/// Entry renderers picked up by the backlog scan (ordinary and paid messages).
pub const ENTRY_NODE_SELECTOR: &str =
    "yt-live-chat-text-message-renderer, yt-live-chat-paid-message-renderer";

/// Attribute carrying the author's role on an entry node.
pub const AUTHOR_TYPE_ATTR: &str = "author-type";

/// Role value that marks the privileged author.
pub const PRIVILEGED_AUTHOR_TYPE: &str = "owner";

/// Author display name, inside an entry node.
pub const AUTHOR_NAME_SELECTOR: &str = "#author-name";

/// Message body, inside an entry node.
pub const MESSAGE_BODY_SELECTOR: &str = "#message";

/// Optional display timestamp, inside an entry node.
pub const TIMESTAMP_SELECTOR: &str = "#timestamp";

/// Author avatar image, inside an entry node.
pub const AUTHOR_PHOTO_SELECTOR: &str = "#author-photo img";

// ── Panel anchors ───────────────────────────────────────────────

/// Host-page insertion anchors, tried in order. The panel is inserted
/// immediately before the first one found.
pub const HOST_ANCHOR_SELECTORS: [&str; 3] =
    ["ytd-live-chat-frame", "#chat-container", "#secondary #chat"];

/// Popout item list; the panel is prepended as its first child.
pub const POPOUT_LIST_SELECTOR: &str = "yt-live-chat-item-list-renderer";

// ── Panel identity ──────────────────────────────────────────────

/// Element id of the injected panel; doubles as the idempotent-mount guard.
pub const PANEL_ID: &str = "chatdock-panel";

/// Name under which the trusted-markup policy registers with the page.
pub const MARKUP_POLICY_NAME: &str = "chatdock";

/// Header title.
pub const PANEL_TITLE: &str = "Streamer messages";

/// Body placeholder shown until the first entry arrives.
pub const PLACEHOLDER_TEXT: &str = "No streamer messages yet...";

// ── Persisted preferences ───────────────────────────────────────

/// Storage key for the enabled flag, holding `"true"` or `"false"`.
pub const ENABLED_KEY: &str = "panel.enabled";

/// Storage key for the panel height, holding an integer string.
pub const HEIGHT_KEY: &str = "panel.height";

// ── Relay ───────────────────────────────────────────────────────

/// Tag identifying chat-entry envelopes on the cross-context channel.
pub const ENTRY_MESSAGE_TYPE: &str = "chatdock:entry";

// ── Timing ──────────────────────────────────────────────────────

/// Interval between attempts to locate the chat container.
pub const CONTAINER_RETRY_MS: u32 = 1_000;

/// Interval between attempts to locate the panel's insertion anchor.
pub const MOUNT_RETRY_MS: u32 = 500;

/// Delay after a detected navigation before re-running the mount, giving the
/// page time to rebuild its layout.
pub const NAV_SETTLE_MS: u32 = 1_000;

// ── Panel geometry ──────────────────────────────────────────────

/// Body height used when no preference is stored.
pub const DEFAULT_PANEL_HEIGHT_PX: i32 = 300;

/// Lower clamp bound for the body height.
pub const MIN_PANEL_HEIGHT_PX: i32 = 80;

/// Upper clamp bound as a fraction of the viewport height.
pub const MAX_HEIGHT_VIEWPORT_FRACTION: f64 = 0.8;

/// Avatar size in each rendered row.
pub const AVATAR_SIZE_PX: i32 = 24;

/// Height applied to inline images (emoji) inside a message fragment.
pub const EMOJI_HEIGHT_PX: i32 = 18;
