//! # Client Configuration
//!
//! Where the back office finds its backend, its persisted session, the
//! document store and the login route.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BACKOFFICE_API_URL=https://api.shop.example                        │
//! │     BACKOFFICE_TIMEOUT_SECS=10                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/backoffice/backoffice.toml (Linux)                       │
//! │     ~/Library/Application Support/com.titan.backoffice/... (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, 30s timeout, /login                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # backoffice.toml
//! [api]
//! base_url = "https://api.shop.example"
//! timeout_secs = 30
//!
//! [session]
//! path = "/var/lib/backoffice/session.json"
//!
//! [documents]
//! base_url = "https://docs.shop.example/v1"
//!
//! [auth]
//! login_route = "/login"
//! allowed_roles = ["owner", "admin"]
//! allowed_access_modes = ["full"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use backoffice_core::{AccessMode, RoleType, DEFAULT_LOGIN_ROUTE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

const ENV_API_URL: &str = "BACKOFFICE_API_URL";
const ENV_TIMEOUT_SECS: &str = "BACKOFFICE_TIMEOUT_SECS";
const ENV_SESSION_PATH: &str = "BACKOFFICE_SESSION_PATH";
const ENV_DOCUMENTS_URL: &str = "BACKOFFICE_DOCUMENTS_URL";
const ENV_LOGIN_ROUTE: &str = "BACKOFFICE_LOGIN_ROUTE";

// =============================================================================
// API Settings
// =============================================================================

/// The REST gateway every settings resource lives behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Where `selectedStoreId`, `userData` and `token` are persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Explicit session file. Falls back to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Document Store Settings
// =============================================================================

/// The document store holding the `StoreUsers` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// REST endpoint of the document store. When unset, store users
    /// operations fail with a configuration error.
    #[serde(default)]
    pub base_url: Option<String>,
}

// =============================================================================
// Auth Settings
// =============================================================================

/// Who may use the back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_login_route")]
    pub login_route: String,

    #[serde(default = "default_allowed_roles")]
    pub allowed_roles: Vec<RoleType>,

    #[serde(default = "default_allowed_access_modes")]
    pub allowed_access_modes: Vec<AccessMode>,
}

fn default_login_route() -> String {
    DEFAULT_LOGIN_ROUTE.to_string()
}

fn default_allowed_roles() -> Vec<RoleType> {
    vec![RoleType::Owner, RoleType::Admin]
}

fn default_allowed_access_modes() -> Vec<AccessMode> {
    vec![AccessMode::Full]
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            login_route: default_login_route(),
            allowed_roles: default_allowed_roles(),
            allowed_access_modes: default_allowed_access_modes(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub documents: DocumentSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (backoffice.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading back office config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load back office config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Back office config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        Self::validate_http_url("api.base_url", &self.api.base_url)?;

        if let Some(ref url) = self.documents.base_url {
            Self::validate_http_url("documents.base_url", url)?;
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if !self.auth.login_route.starts_with('/') {
            return Err(ClientError::InvalidConfig(format!(
                "login_route must start with '/', got: {}",
                self.auth.login_route
            )));
        }

        Ok(())
    }

    fn validate_http_url(field: &str, url: &str) -> ClientResult<()> {
        let parsed = Url::parse(url)
            .map_err(|e| ClientError::InvalidConfig(format!("{} is not a valid URL: {}", field, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "{} must start with http:// or https://, got: {}",
                field, url
            )));
        }
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric {}", ENV_TIMEOUT_SECS),
            }
        }

        if let Some(path) = lookup(ENV_SESSION_PATH) {
            self.session.path = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup(ENV_DOCUMENTS_URL) {
            debug!(url = %url, "Overriding document store URL from environment");
            self.documents.base_url = Some(url);
        }

        if let Some(route) = lookup(ENV_LOGIN_ROUTE) {
            self.auth.login_route = route;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "titan", "backoffice")
            .map(|dirs| dirs.config_dir().join("backoffice.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The session file: configured path, else `session.json` in the
    /// platform data dir.
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session.path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "titan", "backoffice")
                .map(|dirs| dirs.data_dir().join("session.json"))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn documents_url(&self) -> Option<&str> {
        self.documents.base_url.as_deref()
    }

    pub fn login_route(&self) -> &str {
        &self.auth.login_route
    }
}
