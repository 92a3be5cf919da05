//! Where banner and settings documents come from.
//!
//! [`DirSource`] reads the deployed layout:
//!
//! ```text
//! <root>/gacha_settings.json
//! <root>/gacha_pools/<banner>.json
//! ```
//!
//! [`MemorySource`] holds documents in memory for tests and embedding.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use gacha_core::{BannerConfig, ConfigError, GachaSettings};

/// Name of the settings document inside a config root.
pub const SETTINGS_FILE: &str = "gacha_settings.json";
/// Directory holding one document per banner.
pub const POOLS_DIR: &str = "gacha_pools";

/// Read-only access to configuration documents.
pub trait ConfigSource {
    /// Read and parse a banner. Documents missing `rates` or `pools` are
    /// [`ConfigError::Malformed`].
    fn read_banner(&self, name: &str) -> Result<BannerConfig, ConfigError>;

    /// Read and parse the global settings document.
    fn read_settings(&self) -> Result<GachaSettings, ConfigError>;
}

/// Configuration read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Read from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The config root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a banner document.
    pub fn banner_path(&self, name: &str) -> PathBuf {
        self.root.join(POOLS_DIR).join(format!("{name}.json"))
    }

    fn read(&self, path: &Path, name: &str) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(name.to_string()),
            _ => ConfigError::Io {
                name: name.to_string(),
                source: e,
            },
        })
    }
}

impl ConfigSource for DirSource {
    fn read_banner(&self, name: &str) -> Result<BannerConfig, ConfigError> {
        if !is_valid_banner_name(name) {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let text = self.read(&self.banner_path(name), name)?;
        BannerConfig::from_json(name, &text).map_err(|e| malformed(name, e))
    }

    fn read_settings(&self) -> Result<GachaSettings, ConfigError> {
        let text = self.read(&self.root.join(SETTINGS_FILE), SETTINGS_FILE)?;
        GachaSettings::from_json(&text).map_err(|e| malformed(SETTINGS_FILE, e))
    }
}

/// Banner names map straight to file names, so path separators and parent
/// references are refused.
fn is_valid_banner_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

fn malformed(name: &str, e: serde_json::Error) -> ConfigError {
    ConfigError::Malformed {
        name: name.to_string(),
        reason: e.to_string(),
    }
}

/// Configuration documents held in memory as JSON text.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    banners: HashMap<String, String>,
    settings: Option<String>,
}

impl MemorySource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a banner document.
    pub fn with_banner(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.banners.insert(name.into(), json.into());
        self
    }

    /// Set the settings document.
    pub fn with_settings(mut self, json: impl Into<String>) -> Self {
        self.settings = Some(json.into());
        self
    }

    /// Replace a banner document in place.
    pub fn put_banner(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.banners.insert(name.into(), json.into());
    }

    /// Remove a banner document.
    pub fn remove_banner(&mut self, name: &str) {
        self.banners.remove(name);
    }
}

impl ConfigSource for MemorySource {
    fn read_banner(&self, name: &str) -> Result<BannerConfig, ConfigError> {
        let text = self
            .banners
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
        BannerConfig::from_json(name, text).map_err(|e| malformed(name, e))
    }

    fn read_settings(&self) -> Result<GachaSettings, ConfigError> {
        let text = self
            .settings
            .as_deref()
            .ok_or_else(|| ConfigError::NotFound(SETTINGS_FILE.to_string()))?;
        GachaSettings::from_json(text).map_err(|e| malformed(SETTINGS_FILE, e))
    }
}
