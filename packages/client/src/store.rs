// ABOUTME: Persistence for the single bearer token kept between runs
// ABOUTME: File-backed TOML store under ~/.storyloom and an in-memory store for tests

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use storyloom_config::constants::HOME;
use storyloom_config::env_string;
use storyloom_core::ACCESS_TOKEN_KEY;

use crate::error::{ClientError, ClientResult};

const CONFIG_DIR: &str = ".storyloom";
const AUTH_FILE: &str = "auth.toml";

/// Storage for the bearer token under the `access_token` key
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ClientResult<Option<String>>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
}

/// TOML file holding `access_token = "..."`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.storyloom/auth.toml`, where `~` is `$HOME` when set
    pub fn default_location() -> ClientResult<Self> {
        Self::under_home(env_string(HOME).map(PathBuf::from).or_else(dirs::home_dir))
    }

    fn under_home(home_dir: Option<PathBuf>) -> ClientResult<Self> {
        let home_dir =
            home_dir.ok_or_else(|| ClientError::config("Could not determine home directory"))?;
        Ok(Self::new(home_dir.join(CONFIG_DIR).join(AUTH_FILE)))
    }

    /// Use the override path when given, else the default location
    pub fn resolve(override_path: Option<&Path>) -> ClientResult<Self> {
        match override_path {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredToken = toml::from_str(&content)
            .map_err(|e| ClientError::config(format!("Invalid auth file: {}", e)))?;
        if stored.access_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(stored.access_token))
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&StoredToken {
            access_token: token.to_string(),
        })
        .map_err(|e| ClientError::Serialization(format!("Failed to serialize token: {}", e)))?;
        fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!("Saved {} to {}", ACCESS_TOKEN_KEY, self.path.display());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
