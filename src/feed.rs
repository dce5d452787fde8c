//! Extraction and dedupe core of the pipeline.
//!
//! Everything here is DOM-free: the browser side hands in [`RawCandidate`]
//! field sets through an [`EntrySource`] adapter, and [`FeedCore`] decides
//! which of them become [`ChatEntry`] values. That keeps the ordering and
//! dedupe rules testable against synthetic candidates instead of a live
//! document.

use std::collections::HashSet;

use crate::consts::PRIVILEGED_AUTHOR_TYPE;
use crate::sanitize;

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;

/// Raw fields read off one candidate node, before any filtering.
///
/// Every field is optional: absence means the node did not carry that part,
/// not that extraction failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawCandidate {
    /// Author role attribute, if the node carries one.
    pub author_role: Option<String>,
    /// Author display name.
    pub author_name: Option<String>,
    /// Message body as an HTML fragment, unsanitized.
    pub message_html: Option<String>,
    /// Message body as plain text.
    pub message_text: Option<String>,
    /// Display timestamp, if the source rendered one.
    pub timestamp: Option<String>,
    /// Author avatar URL.
    pub author_photo_url: Option<String>,
}

/// One privileged message, immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEntry {
    pub author_name: String,
    /// Sanitized HTML fragment; may contain inline emoji images.
    pub message_html: String,
    /// Plain-text rendering, used only for the dedupe key.
    pub message_text: String,
    /// Opaque display string, generated locally when the source omits one.
    pub timestamp: String,
    /// Possibly empty.
    pub author_photo_url: String,
}

impl ChatEntry {
    /// Identity of the entry within a page session. Two entries with the
    /// same key are the same message, however often the page re-renders it.
    #[must_use]
    pub fn dedupe_key(&self) -> String {
        format!("{}-{}-{}", self.author_name, self.timestamp, self.message_text)
    }
}

/// Read-only adapter over whatever holds the chat entries.
///
/// Production code implements this over the live widget's DOM; tests
/// implement it over an in-memory list of candidates.
pub trait EntrySource {
    type Node;

    /// The container that receives newly inserted entry nodes, if it exists
    /// yet.
    fn find_container(&self) -> Option<Self::Node>;

    /// All entry nodes currently present under the container, oldest first.
    fn backlog(&self, container: &Self::Node) -> Vec<Self::Node>;

    /// Raw fields of one node.
    fn extract_fields(&self, node: &Self::Node) -> RawCandidate;
}

/// Applies the extraction rule and owns the seen-set.
///
/// One instance per observing context; contexts never share one.
#[derive(Debug, Default)]
pub struct FeedCore {
    seen: HashSet<String>,
}

impl FeedCore {
    #[must_use]
    pub fn new() -> FeedCore {
        FeedCore::default()
    }

    /// Runs one candidate through the extraction rule.
    ///
    /// Returns the entry exactly once per dedupe key: rejected candidates
    /// and repeats both come back as `None`. `fallback_timestamp` stands in
    /// when the candidate has no usable timestamp of its own, and becomes
    /// part of the entry's identity.
    pub fn offer(
        &mut self,
        candidate: RawCandidate,
        fallback_timestamp: &str,
    ) -> Option<ChatEntry> {
        if candidate.author_role.as_deref() != Some(PRIVILEGED_AUTHOR_TYPE) {
            return None;
        }
        let author_name = candidate.author_name?.trim().to_string();
        let message_html = candidate.message_html?;
        let message_text = candidate.message_text?.trim().to_string();
        let timestamp = match candidate.timestamp.as_deref().map(str::trim) {
            Some(shown) if !shown.is_empty() => shown.to_string(),
            _ => fallback_timestamp.to_string(),
        };
        let entry = ChatEntry {
            author_name,
            message_html: sanitize::clean_fragment(&message_html),
            message_text,
            timestamp,
            author_photo_url: candidate.author_photo_url.unwrap_or_default(),
        };
        if !self.seen.insert(entry.dedupe_key()) {
            return None;
        }
        Some(entry)
    }

    /// Number of distinct entries accepted so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Feeds every backlog node under `container` through `feed`, oldest first,
/// invoking `sink` for each emitted entry. Returns the emitted count.
///
/// The live-insertion path reuses the same `feed`, so entries that appear
/// both in the backlog and as an insertion are still emitted once.
pub fn scan_backlog<S: EntrySource>(
    source: &S,
    container: &S::Node,
    feed: &mut FeedCore,
    fallback_timestamp: &str,
    mut sink: impl FnMut(ChatEntry),
) -> usize {
    let mut emitted = 0;
    for node in source.backlog(container) {
        if let Some(entry) = feed.offer(source.extract_fields(&node), fallback_timestamp) {
            sink(entry);
            emitted += 1;
        }
    }
    emitted
}
