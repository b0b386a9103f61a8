use std::cell::RefCell;
use std::rc::Rc;

use web_sys::window;

/// Durable home of the bearer token.
///
/// Every operation is synchronous and best effort: a store that cannot
/// persist logs a warning instead of failing the caller.
pub trait SessionStore {
    /// Prepare the backing storage. Called once by the controller on startup.
    fn init(&self) {}

    fn read(&self) -> Option<String>;

    fn write(&self, token: &str);

    fn clear(&self);
}

/// Token stored in the browser's `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageSessionStore {
    key: String,
}

impl LocalStorageSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl SessionStore for LocalStorageSessionStore {
    fn init(&self) {
        if get_local_storage().is_none() {
            log::warn!("localStorage is unavailable, session will not survive a reload");
        }
    }

    fn read(&self) -> Option<String> {
        get_local_storage()?
            .get_item(&self.key)
            .ok()?
            .filter(|t| !t.is_empty())
    }

    fn write(&self, token: &str) {
        if let Some(storage) = get_local_storage() {
            if storage.set_item(&self.key, token).is_err() {
                log::warn!("Failed to persist session token");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    token: Rc<RefCell<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        *store.token.borrow_mut() = Some(token.into());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn write(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}
