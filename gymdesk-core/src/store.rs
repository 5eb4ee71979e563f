//! Persistence for access/refresh tokens, session cookies and the cached user.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::User;

/// Everything a session keeps between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// `name=value` pairs of the server's session cookies (cookie scheme).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
}

impl StoredCredentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.user.is_none()
            && self.cookies.is_empty()
    }
}

/// Where a session keeps its credentials.
///
/// Calls are short and synchronous; they are never held across an await.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> ApiResult<StoredCredentials>;
    fn save(&self, credentials: &StoredCredentials) -> ApiResult<()>;
    fn clear(&self) -> ApiResult<()>;
}

/// In-process store. One per account when several sessions coexist.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoredCredentials>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(credentials: StoredCredentials) -> Self {
        MemoryStore {
            inner: Mutex::new(credentials),
        }
    }

    fn lock(&self) -> ApiResult<std::sync::MutexGuard<'_, StoredCredentials>> {
        self.inner
            .lock()
            .map_err(|_| ApiError::Storage("credential store lock poisoned".into()))
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> ApiResult<StoredCredentials> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> ApiResult<()> {
        *self.lock()? = credentials.clone();
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        *self.lock()? = StoredCredentials::default();
        Ok(())
    }
}

/// TOML file store, by default at ~/.config/gymdesk/session.toml
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> ApiResult<StoredCredentials> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            ApiError::Storage(format!(
                "Failed to read session from {}: {}",
                self.path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            ApiError::Storage(format!(
                "Failed to parse session from {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, credentials: &StoredCredentials) -> ApiResult<()> {
        let contents = toml::to_string_pretty(credentials)
            .map_err(|e| ApiError::Storage(format!("Failed to serialize session: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents).map_err(|e| {
            ApiError::Storage(format!(
                "Failed to write session to {}: {}",
                self.path.display(),
                e
            ))
        })?;

        // Owner-only (0600), the file holds bearer tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
