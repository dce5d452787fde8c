use super::*;

// ── Live-chat addresses ─────────────────────────────────────────

#[test]
fn nested_live_chat_is_embedded_frame() {
    assert_eq!(
        PageRole::classify("/live_chat?is_popout=0", true),
        PageRole::EmbeddedFrame
    );
}

#[test]
fn top_level_live_chat_is_standalone_popout() {
    assert_eq!(
        PageRole::classify("/live_chat?v=abc123", false),
        PageRole::StandalonePopout
    );
}

#[test]
fn replay_variant_counts_as_live_chat() {
    assert_eq!(
        PageRole::classify("/live_chat_replay?v=abc123", true),
        PageRole::EmbeddedFrame
    );
    assert_eq!(
        PageRole::classify("/live_chat_replay", false),
        PageRole::StandalonePopout
    );
}

// ── Other matched addresses ─────────────────────────────────────

#[test]
fn watch_page_is_host_page() {
    assert_eq!(PageRole::classify("/watch?v=abc123", false), PageRole::HostPage);
}

#[test]
fn live_landing_page_is_host_page() {
    assert_eq!(PageRole::classify("/live/abc123", false), PageRole::HostPage);
}

#[test]
fn nesting_does_not_matter_outside_live_chat() {
    // A nested watch page is not a thing the page produces, but the
    // classifier must still be total over its inputs.
    assert_eq!(PageRole::classify("/watch?v=abc123", true), PageRole::HostPage);
}

#[test]
fn live_chat_must_be_a_path_prefix() {
    assert_eq!(PageRole::classify("/feed/live_chat", false), PageRole::HostPage);
}
