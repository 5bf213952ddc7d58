//! Sumi-Sitemap: pull-based sitemap streaming
//!
//! This crate streams location entries out of the three conventional sitemap
//! encodings: XML sitemap-index documents, XML urlset documents and plain
//! newline-delimited URL lists. It does not fetch anything; callers hand it a
//! seekable byte stream and pull entries one at a time.

pub mod access;
pub mod config;
pub mod entry;
pub mod iterator;
pub mod source;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Sitemap operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Config file error: {0}")]
    Config(#[from] ConfigError),

    #[error("XML document contained no <{element}> elements")]
    EmptyDocument { element: &'static str },

    #[error("XML decode error at byte {position}: {source}")]
    Decode {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("XML document ended inside <{element}>")]
    Truncated { element: &'static str },

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error("Failed to rewind stream: {0}")]
    Rewind(#[source] std::io::Error),

    #[error("Failed to read line: {0}")]
    LineRead(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of turning one raw entry into a domain entity
///
/// `Hard` means the location itself was unusable and the stream halts there.
/// `Soft` accompanies an entity that was still produced.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Unusable location {location:?}: {source}")]
    Hard {
        location: String,
        #[source]
        source: UrlError,
    },

    #[error(
        "Entry {location} has {} anomalous field(s): {}",
        .anomalies.len(),
        entry::describe_anomalies(.anomalies)
    )]
    Soft {
        location: ::url::Url,
        anomalies: Vec<entry::FieldAnomaly>,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Location is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Sitemap operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use access::{AccessRule, AllowAll};
pub use config::Config;
pub use entry::{IndexEntry, PageEntry};
pub use iterator::{
    Discovered, Entries, PlainPageIterator, SitemapIterator, XmlIndexIterator, XmlPageIterator,
};
pub use source::{detect_format, PageIterator, SitemapFormat, SitemapSource, SitemapStream};
