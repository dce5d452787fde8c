//! Source adapter over the host page's chat widget.
//!
//! All widget-specific selectors live in [`crate::consts`]; this adapter
//! turns matching DOM nodes into [`RawCandidate`] values and nothing else.
//! Filtering, dedupe, and sanitization happen downstream in
//! [`crate::feed::FeedCore`].

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

use crate::consts::{
    AUTHOR_NAME_SELECTOR, AUTHOR_PHOTO_SELECTOR, AUTHOR_TYPE_ATTR, CHAT_CONTAINER_SELECTOR,
    ENTRY_NODE_SELECTOR, MESSAGE_BODY_SELECTOR, TIMESTAMP_SELECTOR,
};
use crate::feed::{EntrySource, RawCandidate};

/// Read-only view of the chat widget's DOM.
#[derive(Clone)]
pub struct ChatDomSource {
    document: Document,
}

impl ChatDomSource {
    #[must_use]
    pub fn new(document: Document) -> ChatDomSource {
        ChatDomSource { document }
    }

    fn field_text(node: &Element, selector: &str) -> Option<String> {
        node.query_selector(selector)
            .unwrap_or(None)
            .and_then(|element| element.text_content())
    }
}

impl EntrySource for ChatDomSource {
    type Node = Element;

    fn find_container(&self) -> Option<Element> {
        self.document
            .query_selector(CHAT_CONTAINER_SELECTOR)
            .unwrap_or(None)
    }

    fn backlog(&self, container: &Element) -> Vec<Element> {
        let mut nodes = Vec::new();
        if let Ok(list) = container.query_selector_all(ENTRY_NODE_SELECTOR) {
            for index in 0..list.length() {
                if let Some(node) = list.get(index) {
                    if let Some(element) = node.dyn_ref::<Element>() {
                        nodes.push(element.clone());
                    }
                }
            }
        }
        nodes
    }

    fn extract_fields(&self, node: &Element) -> RawCandidate {
        let message = node.query_selector(MESSAGE_BODY_SELECTOR).unwrap_or(None);
        RawCandidate {
            author_role: node.get_attribute(AUTHOR_TYPE_ATTR),
            author_name: Self::field_text(node, AUTHOR_NAME_SELECTOR),
            message_html: message.as_ref().map(Element::inner_html),
            message_text: message.as_ref().and_then(|element| element.text_content()),
            timestamp: Self::field_text(node, TIMESTAMP_SELECTOR),
            author_photo_url: node
                .query_selector(AUTHOR_PHOTO_SELECTOR)
                .unwrap_or(None)
                .and_then(|element| {
                    element.dyn_ref::<HtmlImageElement>().map(HtmlImageElement::src)
                }),
        }
    }
}
