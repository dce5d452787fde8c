//! Panel preference storage.

use web_sys::{Storage, Window};

use crate::panel::PrefsStore;

/// [`PrefsStore`] over the page origin's local storage.
pub struct LocalPrefs {
    storage: Storage,
}

impl LocalPrefs {
    /// `None` when the page denies storage access, as sandboxed frames do.
    #[must_use]
    pub fn new(window: &Window) -> Option<LocalPrefs> {
        match window.local_storage() {
            Ok(Some(storage)) => Some(LocalPrefs { storage }),
            _ => None,
        }
    }
}

impl PrefsStore for LocalPrefs {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).unwrap_or(None)
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            log::warn!("preference write for {key} failed: {err:?}");
        }
    }
}

/// Fallback store when storage is denied: defaults in, nothing kept.
pub struct EphemeralPrefs;

impl PrefsStore for EphemeralPrefs {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, _key: &str, _value: &str) {}
}

/// The best store the page allows.
#[must_use]
pub fn resolve(window: &Window) -> Box<dyn PrefsStore> {
    match LocalPrefs::new(window) {
        Some(local) => Box::new(local),
        None => {
            log::warn!("storage unavailable, panel preferences will not persist");
            Box::new(EphemeralPrefs)
        }
    }
}
