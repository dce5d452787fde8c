//! Cancellable fixed-interval retry tasks.
//!
//! The page exposes no event for "the chat widget finished bootstrapping",
//! so discovery of containers and anchors is retried on a timer. Each task
//! carries a [`CancelToken`] and stops on the first success or on
//! cancellation, whichever comes first. The token half is plain state, so
//! "never found, then torn down" is testable without a browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;

/// Shared cancellation flag for one retry task.
///
/// Clones observe the same flag; cancelling any of them stops the task at
/// its next tick.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Runs `attempt` now and then every `interval_ms` until it returns true or
/// the returned token is cancelled. The timer handle lives inside the task;
/// dropping the token does not stop it.
#[must_use]
pub fn spawn(interval_ms: u32, mut attempt: impl FnMut() -> bool + 'static) -> CancelToken {
    let token = CancelToken::new();
    if attempt() {
        return token;
    }
    let slot: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let tick_token = token.clone();
    let tick_slot = Rc::clone(&slot);
    let interval = Interval::new(interval_ms, move || {
        if tick_token.is_cancelled() || attempt() {
            if let Some(active) = tick_slot.borrow_mut().take() {
                active.cancel();
            }
        }
    });
    *slot.borrow_mut() = Some(interval);
    token
}
