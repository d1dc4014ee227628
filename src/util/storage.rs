//! Browser `localStorage` behind a small key-value trait.
//!
//! SYSTEM CONTEXT
//! ==============
//! The persisted session record and the theme preference are the only
//! things this client stores. Both go through [`KeyValueStore`] so the
//! session flows can run against an in-memory store in tests.

/// String key-value storage.
pub trait KeyValueStore: Clone + 'static {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a description when the write was refused (quota, privacy mode,
    /// no browser).
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    fn remove(&self, key: &str);
}

/// `window.localStorage`. Reads miss and writes fail outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_owned())?;
            storage
                .set_item(key, value)
                .map_err(|e| format!("localStorage write failed: {e:?}"))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err("not available on server".to_owned())
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}
