//! # Session Storage
//!
//! The three values the back office keeps between runs: `selectedStoreId`,
//! `userData` and `token`. Persisted as one JSON file; every write goes
//! straight to disk.
//!
//! ```text
//! session.json
//! {
//!   "selectedStoreId": "store-9",
//!   "userData": { "id": "a-1", "roleType": "owner", "accessMode": "full" },
//!   "token": "eyJhbGciOi..."
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use backoffice_core::UserData;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub selected_store_id: Option<String>,
    #[serde(default)]
    pub user_data: Option<UserData>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Persisted client state. Without a path it lives in memory only.
pub struct SessionStore {
    path: Option<PathBuf>,
    data: RwLock<SessionData>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(SessionData::default()),
        }
    }

    /// Opens the session file, starting empty when it does not exist yet.
    ///
    /// A corrupt file is logged and treated as an empty session; the next
    /// write replaces it.
    pub fn open(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ClientError::Session(format!("cannot read {}: {}", path.display(), e)))?;
            match serde_json::from_str(&contents) {
                Ok(data) => {
                    debug!(?path, "Loaded session");
                    data
                }
                Err(e) => {
                    warn!(?path, error = %e, "Session file is corrupt, starting empty");
                    SessionData::default()
                }
            }
        } else {
            debug!(?path, "No session file yet");
            SessionData::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn snapshot(&self) -> SessionData {
        self.data.read().expect("session lock poisoned").clone()
    }

    pub fn selected_store_id(&self) -> Option<String> {
        self.data
            .read()
            .expect("session lock poisoned")
            .selected_store_id
            .clone()
    }

    pub fn user_data(&self) -> Option<UserData> {
        self.data.read().expect("session lock poisoned").user_data.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.data.read().expect("session lock poisoned").token.clone()
    }

    /// Admin id of the signed-in user.
    pub fn admin_id(&self) -> Option<String> {
        self.user_data().map(|u| u.id)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn set_selected_store(&self, store_id: Option<String>) -> ClientResult<()> {
        self.update(|data| data.selected_store_id = store_id)
    }

    pub fn set_token(&self, token: Option<String>) -> ClientResult<()> {
        self.update(|data| data.token = token)
    }

    pub fn login(&self, token: String, user: UserData) -> ClientResult<()> {
        info!(user_id = %user.id, role = ?user.role_type, "Session started");
        self.update(|data| {
            data.token = Some(token);
            data.user_data = Some(user);
        })
    }

    /// Forgets everything, including the selected store.
    pub fn logout(&self) -> ClientResult<()> {
        info!("Session cleared");
        self.update(|data| *data = SessionData::default())
    }

    /// Applies `mutate` to a copy and swaps it in only once it is on disk.
    /// A failed write leaves the session as it was.
    fn update(&self, mutate: impl FnOnce(&mut SessionData)) -> ClientResult<()> {
        let mut data = self.data.write().expect("session lock poisoned");
        let mut next = data.clone();
        mutate(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn persist(&self, data: &SessionData) -> ClientResult<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Session(format!("cannot create {}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(path, contents)
            .map_err(|e| ClientError::Session(format!("cannot write {}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{AccessMode, RoleType};

    fn owner() -> UserData {
        UserData {
            id: "a-1".to_string(),
            role_type: RoleType::Owner,
            access_mode: AccessMode::Full,
        }
    }

    #[test]
    fn test_in_memory_session() {
        let session = SessionStore::in_memory();
        assert!(session.token().is_none());

        session.login("tok".to_string(), owner()).unwrap();
        assert_eq!(session.admin_id().as_deref(), Some("a-1"));

        session.set_selected_store(Some("s-1".to_string())).unwrap();
        assert_eq!(session.selected_store_id().as_deref(), Some("s-1"));

        session.logout().unwrap();
        assert_eq!(session.snapshot(), SessionData::default());
    }

    #[test]
    fn test_file_session_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        {
            let session = SessionStore::open(&path).unwrap();
            session.login("tok".to_string(), owner()).unwrap();
            session.set_selected_store(Some("s-2".to_string())).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"selectedStoreId\": \"s-2\""));
        assert!(contents.contains("\"roleType\": \"owner\""));

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("tok"));
        assert_eq!(reopened.user_data(), Some(owner()));
    }

    #[test]
    fn test_failed_write_keeps_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = SessionStore::open(&path).unwrap();
        session.set_selected_store(Some("s-1".to_string())).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = session.set_selected_store(Some("s-2".to_string())).unwrap_err();
        assert!(matches!(err, ClientError::Session(_)));
        assert_eq!(session.selected_store_id().as_deref(), Some("s-1"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let session = SessionStore::open(&path).unwrap();
        assert!(session.user_data().is_none());

        session.set_token(Some("fresh".to_string())).unwrap();
        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("fresh"));
    }
}
