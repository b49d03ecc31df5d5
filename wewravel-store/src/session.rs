//! The single process-wide session slot.
//!
//! Only [`SessionStore::establish`] and [`SessionStore::clear`] write it.
//! Every write is persisted before it is published, so a subscriber that
//! reacts to an event always reads the new state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};
use wewravel_shared::{Masked, SessionEvent, UserSession};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The blob written to client-local storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub user: UserSession,
    pub token: Masked<String>,
}

pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;

    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file on disk; survives restarts until logout deletes it.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStorage {
    blob: Mutex<Option<StoredSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.blob.lock().map(|b| b.clone()).unwrap_or(None))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Ok(mut blob) = self.blob.lock() {
            *blob = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut blob) = self.blob.lock() {
            *blob = None;
        }
        Ok(())
    }
}

struct SessionInner {
    slot: RwLock<Option<StoredSession>>,
    events: broadcast::Sender<SessionEvent>,
    storage: Arc<dyn SessionStorage>,
}

/// Cheap to clone; every clone shares the same slot.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Start from whatever the storage holds. An unreadable blob is logged
    /// and discarded rather than blocking startup.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding stored session: {}", e);
                let _ = storage.clear();
                None
            }
        };
        if let Some(session) = &restored {
            info!("Restored session for user {}", session.user.id);
        }
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(SessionInner {
                slot: RwLock::new(restored),
                events,
                storage,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::restore(Arc::new(MemorySessionStorage::new()))
    }

    /// Login completion. Last writer wins.
    pub fn establish(&self, user: UserSession, token: String) -> Result<(), SessionError> {
        let session = StoredSession { user, token: Masked::new(token) };
        self.inner.storage.save(&session)?;
        let event = SessionEvent::LoggedIn {
            user_id: session.user.id,
            name: session.user.name.clone(),
        };
        info!(
            "Session established for user {} ({})",
            session.user.id,
            Masked::new(session.user.email.clone()).hint()
        );
        *self.write_slot() = Some(session);
        // no subscribers is fine
        let _ = self.inner.events.send(event);
        Ok(())
    }

    /// Logout: wipes the slot and the persisted blob together.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.inner.storage.clear()?;
        *self.write_slot() = None;
        info!("Session cleared");
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.read_slot().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read_slot().as_ref().map(|s| s.token.expose().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_slot().is_some()
    }

    /// Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, Option<StoredSession>> {
        self.inner.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> std::sync::RwLockWriteGuard<'_, Option<StoredSession>> {
        self.inner.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> UserSession {
        UserSession {
            id,
            name: name.into(),
            email: format!("user{}@example.com", id),
            mobile: Some("9000000000".into()),
            phone: None,
            contact_number: None,
            created_at: None,
            image_url: None,
        }
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("wewravel-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[test]
    fn writes_are_visible_to_every_clone() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        assert!(!other.is_authenticated());

        store.establish(user(1, "Asha"), "tok-1".into()).unwrap();
        assert_eq!(other.current_user().unwrap().id, 1);
        assert_eq!(other.token().as_deref(), Some("tok-1"));

        store.establish(user(2, "Ravi"), "tok-2".into()).unwrap();
        assert_eq!(other.current_user().unwrap().id, 2);

        other.clear().unwrap();
        assert!(store.current_user().is_none());
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_login_and_logout() {
        let store = SessionStore::in_memory();
        let mut events = store.subscribe();

        store.establish(user(7, "Meera Nair"), "tok".into()).unwrap();
        store.clear().unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::LoggedIn { user_id: 7, name: "Meera Nair".into() }
        );
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn file_storage_survives_restart_until_logout() {
        let path = temp_path();
        let store = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        store.establish(user(3, "Kabir"), "tok-3".into()).unwrap();

        let reloaded = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        assert_eq!(reloaded.current_user().unwrap().name, "Kabir");
        assert_eq!(reloaded.token().as_deref(), Some("tok-3"));

        reloaded.clear().unwrap();
        assert!(!path.exists());
        let after_logout = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        assert!(!after_logout.is_authenticated());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_blob_is_discarded() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        assert!(!store.is_authenticated());
        assert!(!path.exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
