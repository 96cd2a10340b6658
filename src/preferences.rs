//! Persisted user preferences consulted when a fresh search starts.
//!
//! The controller only ever reads preferences. Writing them is up to
//! whatever settings screen owns the file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::config::ConfigError;

/// Preference key holding the sort key (`date_updated` | `username`).
pub const BLOG_FILTER: &str = "blog_filter";

/// Preference key holding the order token (`""` | `"-"`).
pub const BLOG_ORDER: &str = "blog_order";

/// String key/value preference lookup.
pub trait PreferenceStore: Send + Sync {
    /// Stored value for `key`, or `default` when unset.
    fn get(&self, key: &str, default: &str) -> String;
}

/// Preferences held in memory.
#[derive(Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

/// Preferences backed by a flat TOML table of strings.
///
/// ```toml
/// blog_filter = "username"
/// blog_order = "-"
/// ```
pub struct FilePreferences {
    values: HashMap<String, String>,
    path: PathBuf,
}

impl FilePreferences {
    /// Default location: `~/.config/blog-feed/preferences.toml` (or the
    /// platform equivalent via `dirs::config_dir()`).
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("blog-feed").join("preferences.toml")
    }

    /// Load preferences from `path`. A missing file yields an empty store.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self {
                values: HashMap::new(),
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let values: HashMap<String, String> =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), entries = values.len(), "Preferences loaded");

        Ok(Self {
            values,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}
