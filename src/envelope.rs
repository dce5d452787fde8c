//! Wire envelope for cross-context delivery.
//!
//! The embedded chat frame and the host page share no memory; entries cross
//! that boundary as a broadcast JSON object tagged with a fixed type string.
//! This module owns that wire shape. Delivery itself is fire-and-forget:
//! whatever is posted before the receiving side attaches its listener is
//! permanently lost, and no part of this codec buffers or retries.

use serde::{Deserialize, Serialize};

use crate::consts::ENTRY_MESSAGE_TYPE;
use crate::feed::ChatEntry;

/// Error returned by [`decode_entry`].
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The payload is not valid JSON for the envelope shape, or a required
    /// field is missing.
    #[error("failed to decode relay envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The payload parsed but its tag belongs to someone else's message.
    #[error("foreign envelope tag: {0:?}")]
    ForeignTag(String),
}

/// The broadcast object, exactly as other contexts see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope {
    #[serde(rename = "type")]
    tag: String,
    author_name: String,
    message_html: String,
    message_text: String,
    timestamp: String,
    author_photo_url: String,
}

impl WireEnvelope {
    fn wrap(entry: &ChatEntry) -> WireEnvelope {
        WireEnvelope {
            tag: ENTRY_MESSAGE_TYPE.to_string(),
            author_name: entry.author_name.clone(),
            message_html: entry.message_html.clone(),
            message_text: entry.message_text.clone(),
            timestamp: entry.timestamp.clone(),
            author_photo_url: entry.author_photo_url.clone(),
        }
    }

    fn into_entry(self) -> ChatEntry {
        ChatEntry {
            author_name: self.author_name,
            message_html: self.message_html,
            message_text: self.message_text,
            timestamp: self.timestamp,
            author_photo_url: self.author_photo_url,
        }
    }
}

/// Encodes an entry into envelope JSON for broadcasting.
///
/// # Errors
///
/// Returns [`EnvelopeError::Malformed`] if serialization fails, which a
/// plain string struct does not do in practice.
pub fn encode_entry(entry: &ChatEntry) -> Result<String, EnvelopeError> {
    Ok(serde_json::to_string(&WireEnvelope::wrap(entry))?)
}

/// Decodes envelope JSON back into an entry.
///
/// Anything on the page may post messages, so both failure modes are routine
/// and the receiver treats them as "not for us".
///
/// # Errors
///
/// Returns [`EnvelopeError::Malformed`] for non-envelope payloads and
/// [`EnvelopeError::ForeignTag`] when the tag names another protocol.
pub fn decode_entry(json: &str) -> Result<ChatEntry, EnvelopeError> {
    let envelope: WireEnvelope = serde_json::from_str(json)?;
    if envelope.tag != ENTRY_MESSAGE_TYPE {
        return Err(EnvelopeError::ForeignTag(envelope.tag));
    }
    Ok(envelope.into_entry())
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
