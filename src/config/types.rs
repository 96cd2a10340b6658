use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::PAGINATION_PAGE_SIZE;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Settings for the list controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Posts per page the query source returns (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Preferences file override. Defaults to `preferences.toml` next to the
    /// config file.
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

fn default_page_size() -> usize {
    PAGINATION_PAGE_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            preferences_path: None,
        }
    }
}

/// Runtime parameters handed to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// A batch shorter than this marks the query as exhausted.
    pub page_size: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: PAGINATION_PAGE_SIZE,
        }
    }
}

impl From<&FeedConfig> for ControllerConfig {
    fn from(feed: &FeedConfig) -> Self {
        Self {
            page_size: feed.page_size,
        }
    }
}
