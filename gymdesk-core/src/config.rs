//! Global gymdesk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "GYMDESK";

/// How credentials travel to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>` from the credential store.
    #[default]
    Bearer,
    /// Server-set session cookies kept in the client's cookie jar.
    Cookie,
}

/// Global configuration at ~/.config/gymdesk/config.toml
///
/// Every field can be overridden with a `GYMDESK_` environment variable,
/// e.g. `GYMDESK_API_URL=https://crm.example.com`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymdeskConfig {
    pub api_url: String,

    pub timeout_secs: u64,

    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Where tokens are persisted. Defaults to ~/.config/gymdesk/session.toml
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,
}

impl Default for GymdeskConfig {
    fn default() -> Self {
        GymdeskConfig {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_scheme: AuthScheme::default(),
            session_path: None,
        }
    }
}

pub fn config_dir() -> ApiResult<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| ApiError::Config("Could not determine config directory".into()))?
        .join("gymdesk"))
}

impl GymdeskConfig {
    pub fn config_path() -> ApiResult<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load defaults, then the config file (if any), then `GYMDESK_*` env vars.
    pub fn load() -> ApiResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> ApiResult<Self> {
        let settings = config::Config::builder()
            .set_default("api_url", DEFAULT_API_URL)
            .and_then(|b| b.set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64))
            .map_err(|e| ApiError::Config(e.to_string()))?
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| ApiError::Config(format!("{}: {}", path.display(), e)))?;

        let mut cfg: GymdeskConfig = settings
            .try_deserialize()
            .map_err(|e| ApiError::Config(format!("{}: {}", path.display(), e)))?;

        cfg.normalize()?;
        Ok(cfg)
    }

    fn normalize(&mut self) -> ApiResult<()> {
        self.api_url = self.api_url.trim_end_matches('/').to_string();

        url::Url::parse(&self.api_url)
            .map_err(|e| ApiError::Config(format!("Invalid api_url '{}': {}", self.api_url, e)))?;

        if self.timeout_secs == 0 {
            return Err(ApiError::Config("timeout_secs must be at least 1".into()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn session_path(&self) -> ApiResult<PathBuf> {
        match &self.session_path {
            Some(p) => Ok(p.clone()),
            None => Ok(config_dir()?.join("session.toml")),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ApiResult<()> {
        let contents = format!(
            "\
# gymdesk configuration

# Backend base URL:
# api_url = \"{}\"

# Request timeout in seconds:
# timeout_secs = {}

# \"bearer\" (tokens) or \"cookie\" (server session cookies); both are
# kept in the session file between runs:
# auth_scheme = \"bearer\"
",
            DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ApiError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
