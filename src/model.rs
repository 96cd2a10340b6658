//! Domain types shared by the view state, the query source and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of posts the server returns per page.
pub const PAGINATION_PAGE_SIZE: usize = 10;

/// A single blog post as returned by the query source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub pk: u32,
    pub title: String,
    pub slug: String,
    pub body: String,
    #[serde(default)]
    pub image: String,
    /// Last update time in epoch milliseconds.
    pub date_updated: i64,
    pub username: String,
}

/// Errors produced when parsing stored ordering preferences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown blog order token '{0}'")]
    UnknownOrder(String),

    #[error("Unknown blog filter key '{0}'")]
    UnknownFilter(String),
}

/// Ordering direction.
///
/// On the wire the direction is a prefix of the sort key:
/// `""` = ascending, `"-"` = descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogOrder {
    #[default]
    Asc,
    Desc,
}

impl BlogOrder {
    pub fn token(self) -> &'static str {
        match self {
            BlogOrder::Asc => "",
            BlogOrder::Desc => "-",
        }
    }
}

impl FromStr for BlogOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(BlogOrder::Asc),
            "-" => Ok(BlogOrder::Desc),
            other => Err(ModelError::UnknownOrder(other.to_string())),
        }
    }
}

/// Sort key for the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogFilter {
    #[default]
    DateUpdated,
    Username,
}

impl BlogFilter {
    pub fn key(self) -> &'static str {
        match self {
            BlogFilter::DateUpdated => "date_updated",
            BlogFilter::Username => "username",
        }
    }
}

impl FromStr for BlogFilter {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date_updated" => Ok(BlogFilter::DateUpdated),
            "username" => Ok(BlogFilter::Username),
            other => Err(ModelError::UnknownFilter(other.to_string())),
        }
    }
}

impl fmt::Display for BlogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Composite ordering key sent to the query source, e.g. `-date_updated`.
pub fn order_filter_key(order: BlogOrder, filter: BlogFilter) -> String {
    format!("{}{}", order.token(), filter.key())
}
