// ABOUTME: Explicit session context shared by the clients and services
// ABOUTME: Holds the bearer token and signed-in identity and persists the token through a TokenStore

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use storyloom_core::User;
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::store::{MemoryTokenStore, TokenStore};

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Cloneable handle to one session. Clones share state.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Session")
            .field("authenticated", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|u| u.id.as_str()))
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            store,
        }
    }

    /// Session backed by a process-local store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store the token and identity, persisting the token first
    pub fn sign_in(&self, token: impl Into<String>, user: User) -> ClientResult<()> {
        let token = token.into();
        let mut state = self.write();
        self.store.save(&token)?;
        info!("Signed in as {}", user.email);
        state.token = Some(token);
        state.user = Some(user);
        Ok(())
    }

    /// Replace the identity while keeping the token
    pub fn set_user(&self, user: User) {
        self.write().user = Some(user);
    }

    /// Replace the token (after a refresh), persisting it
    pub fn set_token(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        let mut state = self.write();
        self.store.save(&token)?;
        state.token = Some(token);
        Ok(())
    }

    /// Clear memory and store under one write guard.
    /// Memory is cleared even if the store fails.
    pub fn sign_out(&self) -> ClientResult<()> {
        let mut state = self.write();
        state.token = None;
        state.user = None;
        let cleared = self.store.clear();
        if let Err(e) = &cleared {
            warn!("Failed to clear persisted token: {}", e);
        } else {
            info!("Signed out");
        }
        cleared
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().user.as_ref().map(|user| user.id.clone())
    }

    /// True when a token is held in memory
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Whether a token was persisted by an earlier sign-in
    pub fn has_persisted_token(&self) -> bool {
        match self.store.load() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!("Failed to read persisted token: {}", e);
                false
            }
        }
    }

    /// Load a persisted token into memory without an identity.
    /// Returns whether a token was found.
    pub fn restore(&self) -> ClientResult<bool> {
        let mut state = self.write();
        match self.store.load()? {
            Some(token) => {
                state.token = Some(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
