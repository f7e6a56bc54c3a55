//! Session store backed by a local JSON file.
//!
//! The browser storefront keeps the signed-in session in persisted local
//! storage under the keys `user` and `token`. This provider mirrors that
//! layout in a single JSON file:
//!
//! ```json
//! { "user": { "Id": "...", "Email": "..." }, "token": "..." }
//! ```
//!
//! A missing or absent file is an empty session. A file that exists but
//! does not parse is a [`StorefrontError::CorruptSession`]: sign-in owns
//! repairing it, this core only reports it.

use crate::error::{Result, StorefrontError};
use crate::providers::{SessionStore, StoredUser};
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;

/// On-disk layout of the session file.
#[derive(Debug, Default, Deserialize)]
struct SessionFile {
    #[serde(default)]
    user: Option<StoredUser>,
    #[serde(default)]
    token: Option<String>,
}

/// File-backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store reading from the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the session file.
    ///
    /// Missing file → empty session. Unreadable file → store error.
    /// Unparseable file → corrupt session.
    async fn read(&self) -> Result<SessionFile> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default());
            },
            Err(e) => return Err(StorefrontError::SessionStore(e.to_string())),
        };

        serde_json::from_str(&contents).map_err(|e| StorefrontError::CorruptSession(e.to_string()))
    }
}

impl SessionStore for FileSessionStore {
    fn load_user(&self) -> impl Future<Output = Result<Option<StoredUser>>> + Send {
        async move { Ok(self.read().await?.user) }
    }

    fn load_token(&self) -> impl Future<Output = Result<Option<String>>> + Send {
        async move { Ok(self.read().await?.token) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store_with(contents: &str) -> (tempfile::TempDir, FileSessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, contents).await.unwrap();
        (dir, FileSessionStore::new(path))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load_user().await.unwrap(), None);
        assert_eq!(store.load_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reads_user_and_token() {
        let (_dir, store) = store_with(
            r#"{
                "user": { "Id": "3d0c6b1e-9f0a-45f2-8a4e-2a7f9b1c0d22", "Email": "a@b.com" },
                "token": "opaque-bearer"
            }"#,
        )
        .await;

        let user = store.load_user().await.unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        assert_eq!(store.load_token().await.unwrap().as_deref(), Some("opaque-bearer"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (_dir, store) = store_with("{ not json").await;
        let result = store.load_user().await;
        assert!(matches!(result, Err(StorefrontError::CorruptSession(_))));
    }

    #[tokio::test]
    async fn test_corrupt_user_entry_is_an_error() {
        let (_dir, store) = store_with(r#"{ "user": { "Email": 42 } }"#).await;
        let result = store.load_user().await;
        assert!(matches!(result, Err(StorefrontError::CorruptSession(_))));
    }
}
