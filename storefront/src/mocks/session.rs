//! Mock session store for testing.

use crate::error::{Result, StorefrontError};
use crate::providers::{SessionStore, StoredUser};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock session store.
///
/// Holds an in-memory profile and token; can be scripted to fail to model
/// an unreadable store.
#[derive(Debug, Clone, Default)]
pub struct MockSessionStore {
    user: Arc<Mutex<Option<StoredUser>>>,
    token: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<StorefrontError>>>,
}

impl MockSessionStore {
    /// Create an empty (signed-out) session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a signed-in user.
    #[must_use]
    pub fn with_user(self, user: StoredUser) -> Self {
        if let Ok(mut slot) = self.user.lock() {
            *slot = Some(user);
        }
        self
    }

    /// Script a bearer token.
    #[must_use]
    pub fn with_token(self, token: &str) -> Self {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        self
    }

    /// Make every read fail with the given error.
    #[must_use]
    pub fn failing(self, error: StorefrontError) -> Self {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = Some(error);
        }
        self
    }

    fn check_failure(&self) -> Result<()> {
        let failure = self
            .failure
            .lock()
            .map_err(|_| StorefrontError::SessionStore("mock lock poisoned".to_string()))?;
        match failure.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl SessionStore for MockSessionStore {
    fn load_user(&self) -> impl Future<Output = Result<Option<StoredUser>>> + Send {
        let store = self.clone();
        async move {
            store.check_failure()?;
            store
                .user
                .lock()
                .map_err(|_| StorefrontError::SessionStore("mock lock poisoned".to_string()))
                .map(|slot| slot.clone())
        }
    }

    fn load_token(&self) -> impl Future<Output = Result<Option<String>>> + Send {
        let store = self.clone();
        async move {
            store.check_failure()?;
            store
                .token
                .lock()
                .map_err(|_| StorefrontError::SessionStore("mock lock poisoned".to_string()))
                .map(|slot| slot.clone())
        }
    }
}
