//! Configuration module for Sumi-Sitemap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to its defaults.
//!
//! # Example
//!
//! ```no_run
//! use sumi_sitemap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap.toml")).unwrap();
//! println!("Plain-text lines are capped at {} bytes", config.reader.max_line_length);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FormatSetting, OutputConfig, ReaderConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
