use crate::iterator::DEFAULT_MAX_LINE_LENGTH;
use crate::source::SitemapFormat;
use crate::SitemapError;
use serde::Deserialize;
use std::str::FromStr;

/// Main configuration structure for Sumi-Sitemap
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How sitemap streams are read
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    /// Encoding of the input, or `auto` to sniff it
    #[serde(default)]
    pub format: FormatSetting,

    /// Longest accepted plain-text line in bytes
    #[serde(rename = "max-line-length", default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            format: FormatSetting::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

/// How entries are reported
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Treat entries with anomalous optional fields as fatal
    #[serde(rename = "fail-on-warning", default)]
    pub fail_on_warning: bool,

    /// Stop after this many entries; 0 means no limit
    #[serde(default)]
    pub limit: usize,
}

/// Input encoding as written in the config file or on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSetting {
    #[default]
    Auto,
    Index,
    Urlset,
    Text,
}

impl FormatSetting {
    /// The fixed format, or None when it should be detected
    pub fn format(self) -> Option<SitemapFormat> {
        match self {
            Self::Auto => None,
            Self::Index => Some(SitemapFormat::Index),
            Self::Urlset => Some(SitemapFormat::Urlset),
            Self::Text => Some(SitemapFormat::Text),
        }
    }
}

impl FromStr for FormatSetting {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        Ok(match s.parse::<SitemapFormat>()? {
            SitemapFormat::Index => Self::Index,
            SitemapFormat::Urlset => Self::Urlset,
            SitemapFormat::Text => Self::Text,
        })
    }
}
