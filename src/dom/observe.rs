//! Chat list subscription and backlog scan.
//!
//! Attachment order matters: the mutation observer is registered before the
//! backlog scan runs, so an insertion landing mid-scan is seen by both and
//! deduped by the shared seen-set rather than lost by neither.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

use crate::consts::CONTAINER_RETRY_MS;
use crate::dom::source::ChatDomSource;
use crate::dom::wall_clock_time;
use crate::feed::{self, ChatEntry, EntrySource, FeedCore};
use crate::retry::{self, CancelToken};

/// Extraction state shared by the backlog scan and the live subscription.
struct Pipeline {
    feed: FeedCore,
    sink: Box<dyn FnMut(ChatEntry)>,
}

impl Pipeline {
    fn offer_node(&mut self, source: &ChatDomSource, node: &Element) {
        let candidate = source.extract_fields(node);
        if let Some(entry) = self.feed.offer(candidate, &wall_clock_time()) {
            (self.sink)(entry);
        }
    }
}

/// Starts watching for privileged chat entries, emitting each into `sink`
/// exactly once, backlog first. The returned token cancels the container
/// search; once attached, the subscription lives for the rest of the page.
#[must_use]
pub fn start(source: ChatDomSource, sink: impl FnMut(ChatEntry) + 'static) -> CancelToken {
    let pipeline = Rc::new(RefCell::new(Pipeline {
        feed: FeedCore::new(),
        sink: Box::new(sink),
    }));
    retry::spawn(CONTAINER_RETRY_MS, move || try_attach(&source, &pipeline))
}

fn try_attach(source: &ChatDomSource, pipeline: &Rc<RefCell<Pipeline>>) -> bool {
    let Some(container) = source.find_container() else {
        log::debug!("chat container not present yet");
        return false;
    };

    let cb_source = source.clone();
    let cb_pipeline = Rc::clone(pipeline);
    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |records: Array, _observer: MutationObserver| {
            let mut pipeline = cb_pipeline.borrow_mut();
            for record in records.iter() {
                let record: MutationRecord = record.unchecked_into();
                let added = record.added_nodes();
                for index in 0..added.length() {
                    if let Some(node) = added.get(index) {
                        if let Some(element) = node.dyn_ref::<Element>() {
                            pipeline.offer_node(&cb_source, element);
                        }
                    }
                }
            }
        },
    );
    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(err) => {
            log::warn!("mutation observer construction failed: {err:?}");
            return false;
        }
    };
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    if let Err(err) = observer.observe_with_options(&container, &options) {
        log::warn!("chat container subscription failed: {err:?}");
        return false;
    }
    callback.forget();

    let now = wall_clock_time();
    let mut pipeline = pipeline.borrow_mut();
    let Pipeline { feed, sink } = &mut *pipeline;
    let emitted = feed::scan_backlog(source, &container, feed, &now, |entry| sink(entry));
    log::info!("chat observer attached, backlog yielded {emitted} entries");
    true
}
