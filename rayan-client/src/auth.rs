//! Bearer token session and its on-disk store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// File name used by [`TokenStore`]
pub const TOKEN_FILE: &str = "token.json";

/// Opaque bearer token issued by the API
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token; blank input yields `None`
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        (!token.is_empty()).then_some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Shared handle to the current token.
///
/// Cloned into the REST client; logging in or out through any clone is
/// visible to every request issued afterwards.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl AuthSession {
    /// Session without a token
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        let session = Self::new();
        session.set(token);
        session
    }

    /// Session seeded from a persisted token, if one is stored
    pub fn from_store(store: &TokenStore) -> Self {
        match store.load() {
            Some(token) => Self::with_token(token),
            None => Self::new(),
        }
    }

    pub fn set(&self, token: AuthToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn current(&self) -> Option<AuthToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: AuthToken,
    saved_at: DateTime<Utc>,
}

/// JSON file holding the token between runs
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at `<dir>/token.json`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(TOKEN_FILE),
        }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save(&self, token: &AuthToken) -> std::io::Result<()> {
        self.ensure_dir()?;
        let stored = StoredToken {
            token: token.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, json)
    }

    /// Stored token; a missing or unreadable file yields `None`
    pub fn load(&self) -> Option<AuthToken> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredToken>(&json) {
            Ok(stored) => Some(stored.token),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
