//! The authenticated session and its durable mirror.

use crate::models::app_state::AppState;
use serde_json::Value;
use shared::ClientConfig;
use shared::models::User;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};
use yewdux::{Context, Dispatch};

/// Name shown for an anonymous visitor.
pub const GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode value: {0}")]
    Encode(String),
}

/// Key/value storage that survives a page reload.
pub trait DurableStorage {
    fn load(&self, key: &str) -> Option<Value>;

    /// # Errors
    /// Fails when the storage is unavailable or full.
    fn store(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    fn delete(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl DurableStorage for BrowserStorage {
    fn load(&self, key: &str) -> Option<Value> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::get(key).ok()
    }

    fn store(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::set(key, value).map_err(|err| StorageError::Unavailable(err.to_string()))
    }

    fn delete(&self, key: &str) {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::delete(key);
    }
}

/// In-memory storage for tests and for hosts without `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl DurableStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn store(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// What changed in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    Updated,
    SignedOut,
    /// The server rejected the session (401).
    Expired,
}

struct DurableMirror {
    storage: Rc<dyn DurableStorage>,
    user_key: String,
    token_key: String,
}

/// Owns the [`AppState`] store; every other part of the app reads through it.
#[derive(Clone)]
pub struct SessionStore {
    mirror: Rc<DurableMirror>,
    dispatch: Dispatch<AppState>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.dispatch.get())
            .field("user_key", &self.mirror.user_key)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a store in `cx` backed by `storage`.
    pub fn new(cx: &Context, storage: Rc<dyn DurableStorage>, config: &ClientConfig) -> Self {
        Self {
            mirror: Rc::new(DurableMirror {
                storage,
                user_key: config.user_storage_key.clone(),
                token_key: config.token_storage_key.clone(),
            }),
            dispatch: Dispatch::new(cx),
        }
    }

    /// Creates a store and restores the user snapshot left by a previous
    /// page load. The server still has the final say at bootstrap.
    pub fn restore(cx: &Context, storage: Rc<dyn DurableStorage>, config: &ClientConfig) -> Self {
        let store = Self::new(cx, storage, config);
        let snapshot = store.mirror.storage.load(&store.mirror.user_key);
        match snapshot.map(serde_json::from_value::<User>) {
            Some(Ok(user)) => {
                debug!(user_id = %user.id, "restored session snapshot");
                store.dispatch.set(AppState {
                    user: Some(user),
                    is_authenticated: true,
                    last_event: None,
                });
            }
            Some(Err(err)) => {
                warn!("discarding unreadable session snapshot: {err}");
                store.mirror.storage.delete(&store.mirror.user_key);
            }
            None => {}
        }
        store
    }

    /// Stores `user`, marks the session authenticated and persists the mirror.
    pub fn set_user(&self, user: User) {
        info!(user_id = %user.id, "signed in");
        self.replace(Some(user), SessionEvent::SignedIn);
    }

    /// Refreshes the cached user after a profile fetch or update.
    pub fn update_user(&self, user: User) {
        self.replace(Some(user), SessionEvent::Updated);
    }

    /// Signs out locally and removes the durable entries.
    pub fn clear_user(&self) {
        info!("signed out");
        self.replace(None, SessionEvent::SignedOut);
    }

    /// Handles a 401. Only notifies when a session was actually active, so
    /// anonymous requests do not bounce the visitor around.
    pub fn expire(&self) {
        if !self.is_authenticated() {
            self.remove_durable();
            return;
        }
        warn!("session expired");
        self.replace(None, SessionEvent::Expired);
    }

    fn replace(&self, user: Option<User>, event: SessionEvent) {
        match &user {
            Some(user) => self.persist(user),
            None => self.remove_durable(),
        }
        self.dispatch.set(AppState {
            is_authenticated: user.is_some(),
            user,
            last_event: Some(event),
        });
    }

    fn persist(&self, user: &User) {
        let result = serde_json::to_value(user)
            .map_err(|err| StorageError::Encode(err.to_string()))
            .and_then(|value| self.mirror.storage.store(&self.mirror.user_key, &value));
        if let Err(err) = result {
            warn!("failed to persist session snapshot: {err}");
        }
    }

    fn remove_durable(&self) {
        self.mirror.storage.delete(&self.mirror.user_key);
        self.mirror.storage.delete(&self.mirror.token_key);
    }

    pub fn state(&self) -> Rc<AppState> {
        self.dispatch.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.dispatch.get().is_authenticated
    }

    pub fn get_user(&self) -> Option<User> {
        self.dispatch.get().user.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.dispatch.get().user.as_ref().map(|user| user.id.clone())
    }

    /// Display name, or [`GUEST_NAME`] when signed out.
    pub fn user_name(&self) -> String {
        self.dispatch
            .get()
            .user
            .as_ref()
            .map_or_else(|| GUEST_NAME.to_string(), User::display_name)
    }

    pub fn user_phone(&self) -> Option<String> {
        self.dispatch
            .get()
            .user
            .as_ref()
            .map(|user| user.phone_number.clone())
            .filter(|phone| !phone.is_empty())
    }

    /// Calls `listener` with every session transition from now on. The
    /// listener stays registered until the returned dispatch is dropped.
    #[must_use = "dropping the returned dispatch unsubscribes"]
    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + 'static) -> Dispatch<AppState> {
        Dispatch::new(self.dispatch.context()).subscribe_silent(move |state: Rc<AppState>| {
            if let Some(event) = state.last_event {
                listener(event);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        serde_json::from_value(json!({
            "id": 12,
            "first_name": "John",
            "last_name": "Kamau",
            "phone_number": "+254712345678",
            "is_verified": true
        }))
        .unwrap()
    }

    fn store_with(storage: &Rc<MemoryStorage>) -> SessionStore {
        let storage: Rc<dyn DurableStorage> = storage.clone();
        SessionStore::new(&Context::new(), storage, &ClientConfig::with_defaults())
    }

    /// Tests set_user followed by clear_user leaves an anonymous session
    #[test]
    fn test_session_round_trip() {
        let storage = Rc::new(MemoryStorage::new());
        let store = store_with(&storage);

        store.set_user(user());
        assert!(store.is_authenticated());
        assert_eq!(store.user_id().as_deref(), Some("12"));
        assert_eq!(store.user_name(), "John Kamau");
        assert!(storage.contains("userData"));

        store.clear_user();
        assert_eq!(store.get_user(), None);
        assert!(!store.is_authenticated());
        assert_eq!(store.user_id(), None);
        assert_eq!(store.user_name(), GUEST_NAME);
        assert!(!storage.contains("userData"));
    }

    /// Tests that every transition is broadcast
    #[test]
    fn test_notifications() {
        let storage = Rc::new(MemoryStorage::new());
        let store = store_with(&storage);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _listener = store.subscribe(move |event| sink.borrow_mut().push(event));

        store.set_user(user());
        store.update_user(user());
        store.clear_user();

        assert_eq!(
            *events.borrow(),
            vec![SessionEvent::SignedIn, SessionEvent::Updated, SessionEvent::SignedOut]
        );
    }

    /// Tests expiry only notifies when a session was active
    #[test]
    fn test_expire() {
        let storage = Rc::new(MemoryStorage::new());
        storage.store("authToken", &json!("legacy")).unwrap();
        let store = store_with(&storage);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _listener = store.subscribe(move |event| sink.borrow_mut().push(event));

        store.expire();
        assert!(events.borrow().is_empty());
        assert!(!storage.contains("authToken"));

        store.set_user(user());
        store.expire();
        assert!(!store.is_authenticated());
        assert_eq!(events.borrow().last(), Some(&SessionEvent::Expired));
    }

    /// Tests restoring from the durable snapshot
    #[test]
    fn test_restore() {
        let storage = Rc::new(MemoryStorage::new());
        store_with(&storage).set_user(user());

        let dyn_storage: Rc<dyn DurableStorage> = storage.clone();
        let restored =
            SessionStore::restore(&Context::new(), dyn_storage, &ClientConfig::with_defaults());
        assert!(restored.is_authenticated());
        assert_eq!(restored.user_phone().as_deref(), Some("+254712345678"));

        storage.store("userData", &json!("not a user")).unwrap();
        let dyn_storage: Rc<dyn DurableStorage> = storage.clone();
        let broken =
            SessionStore::restore(&Context::new(), dyn_storage, &ClientConfig::with_defaults());
        assert!(!broken.is_authenticated());
        assert!(!storage.contains("userData"));
    }

    /// Tests components selecting the store see every change
    #[test]
    fn test_store_is_shared_through_context() {
        let cx = Context::new();
        let storage: Rc<dyn DurableStorage> = Rc::new(MemoryStorage::new());
        let store = SessionStore::new(&cx, storage, &ClientConfig::with_defaults());
        let reader = Dispatch::<AppState>::new(&cx);

        store.set_user(user());
        assert!(reader.get().is_authenticated);
        assert_eq!(reader.get().last_event, Some(SessionEvent::SignedIn));

        store.expire();
        assert_eq!(reader.get().user, None);
        assert_eq!(reader.get().last_event, Some(SessionEvent::Expired));
    }
}
