//! Configuration system for courier.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $COURIER_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/courier/config.toml
//!   3. ~/.config/courier/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    pub node: NodeConfig,
    pub identity: IdentityConfig,
    pub api: ApiConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// This node's own reachable address, canonical `scheme://host:port`.
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Path to the X25519 keypair. Auto-generated on first run.
    pub keypair_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// TCP port for the local diagnostics API.
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Peer addresses merged into the directory at startup.
    pub bootstrap_peers: Vec<String>,
    /// Route entries merged at startup, each `<hex key>@<address>`.
    pub pinned_routes: Vec<String>,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:9600".to_string(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            keypair_path: config_dir().join("keypair"),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 9601 }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            bootstrap_peers: Vec::new(),
            pinned_routes: Vec::new(),
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("courier")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl CourierConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::file_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a specific file, falling back to defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("COURIER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        Self::write_default_at(&path)?;
        Ok(path)
    }

    /// Write default config to `path` if nothing is there yet.
    pub fn write_default_at(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
        }
        let text = toml::to_string_pretty(&CourierConfig::default())
            .map_err(ConfigError::SerializeFailed)?;
        std::fs::write(path, text).map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))
    }

    /// Apply COURIER_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("COURIER_NODE__ADDRESS") {
            self.node.address = v;
        }
        if let Ok(v) = std::env::var("COURIER_IDENTITY__KEYPAIR_PATH") {
            self.identity.keypair_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("COURIER_API__PORT") {
            if let Ok(p) = v.parse() {
                self.api.port = p;
            }
        }
        if let Ok(v) = std::env::var("COURIER_DIRECTORY__BOOTSTRAP_PEERS") {
            self.directory.bootstrap_peers =
                v.split(',').map(|s| s.trim().to_string()).collect();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
