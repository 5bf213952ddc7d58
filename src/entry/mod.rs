//! Sitemap entry definitions
//!
//! This module defines the values an iterator hands out: page entries from
//! urlset documents and plain-text lists, and index entries from sitemap-index
//! documents. The raw, unvalidated shapes decoded from XML live in `raw`.

mod raw;

pub use raw::{Parsed, RawEntry, RawIndexEntry, RawUrlEntry};

use chrono::{DateTime, FixedOffset};
use std::fmt;
use url::Url;

/// Priority assigned when an entry does not carry a usable one
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// A page discovered in a urlset document or a plain-text list
#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry {
    location: Url,
    last_modified: Option<DateTime<FixedOffset>>,
    change_frequency: String,
    priority: f64,
}

impl PageEntry {
    /// Creates a page entry with every optional field absent
    ///
    /// This is the shape produced for each line of a plain-text sitemap.
    pub fn from_location(location: Url) -> Self {
        Self {
            location,
            last_modified: None,
            change_frequency: String::new(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub(crate) fn new(
        location: Url,
        last_modified: Option<DateTime<FixedOffset>>,
        change_frequency: String,
        priority: f64,
    ) -> Self {
        Self {
            location,
            last_modified,
            change_frequency,
            priority,
        }
    }

    /// The page URL
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// When the page last changed, if the sitemap said so
    pub fn last_modified(&self) -> Option<DateTime<FixedOffset>> {
        self.last_modified
    }

    /// How often the page changes; empty when absent
    pub fn change_frequency(&self) -> &str {
        &self.change_frequency
    }

    /// Relative priority, `DEFAULT_PRIORITY` when absent or unusable
    pub fn priority(&self) -> f64 {
        self.priority
    }
}

/// A sub-sitemap listed in a sitemap-index document
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    location: Url,
    last_modified: Option<DateTime<FixedOffset>>,
}

impl IndexEntry {
    pub(crate) fn new(location: Url, last_modified: Option<DateTime<FixedOffset>>) -> Self {
        Self {
            location,
            last_modified,
        }
    }

    /// The sub-sitemap URL
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// When the sub-sitemap last changed, if the index said so
    pub fn last_modified(&self) -> Option<DateTime<FixedOffset>> {
        self.last_modified
    }
}

/// An optional field that had to be discarded or was out of vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAnomaly {
    /// Unreadable last-modified; treated as absent
    LastModified { value: String },

    /// Unreadable or out-of-range priority; replaced by the default
    Priority { value: String },

    /// Unknown change frequency; kept as written
    ChangeFrequency { value: String },
}

impl fmt::Display for FieldAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastModified { value } => write!(f, "unreadable lastmod {:?}", value),
            Self::Priority { value } => {
                write!(f, "priority {:?} replaced by {}", value, DEFAULT_PRIORITY)
            }
            Self::ChangeFrequency { value } => write!(f, "unknown changefreq {:?}", value),
        }
    }
}

/// Joins anomalies into a single human-readable list
pub fn describe_anomalies(anomalies: &[FieldAnomaly]) -> String {
    anomalies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
