use std::cell::RefCell;

pub(crate) const TOKEN_KEY: &str = "access_token";

/// Persistence adapter for the session token.
///
/// The browser implementation is backed by `localStorage`; the in-memory one
/// is used when storage is unavailable (private mode, sandboxed iframes) and
/// in tests.
pub(crate) trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[derive(Clone)]
pub(crate) struct LocalTokenStore {
    storage: web_sys::Storage,
}

impl LocalTokenStore {
    pub fn open() -> Option<Self> {
        local_storage().map(|storage| Self { storage })
    }
}

impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY).ok().flatten()
    }

    fn set(&self, token: &str) {
        if self.storage.set_item(TOKEN_KEY, token).is_err() {
            leptos::logging::warn!("could not persist session token");
        }
    }

    fn clear(&self) {
        if self.storage.remove_item(TOKEN_KEY).is_err() {
            leptos::logging::warn!("could not remove session token");
        }
    }
}

#[derive(Default)]
pub(crate) struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    #[cfg(test)]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryTokenStore::default();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_memory_store_set_overwrites_previous_token() {
        let store = MemoryTokenStore::with_token("old");
        store.set("new");
        assert_eq!(store.get().as_deref(), Some("new"));
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemoryTokenStore::with_token("t");
        store.clear();
        assert!(store.get().is_none());
    }
}
