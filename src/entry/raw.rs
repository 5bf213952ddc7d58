//! Raw entry shapes
//!
//! These hold the string fields of a single `<sitemap>` or `<url>` element
//! exactly as decoded. They exist only long enough to be parsed into an
//! `IndexEntry` or `PageEntry`.

use crate::entry::{FieldAnomaly, IndexEntry, PageEntry};
use crate::url::{check_change_frequency, parse_last_modified, parse_location, parse_priority};
use crate::EntryError;
use url::Url;

/// An entity together with the soft error that accompanied it, if any
#[derive(Debug)]
pub struct Parsed<T> {
    pub entry: T,
    pub warning: Option<EntryError>,
}

/// A format-specific element shape that can be parsed into a domain entity
pub trait RawEntry: Default {
    /// The entity this shape parses into
    type Entry;

    /// Local name of the element that holds one entry
    const ELEMENT: &'static str;

    /// Stores the text of a direct child element; unknown names are ignored
    fn set_field(&mut self, name: &[u8], value: String);

    /// Validates the fields
    ///
    /// `Err` is always `EntryError::Hard`: the location was unusable.
    /// A soft error, when present, rides along with the entity.
    fn parse(self) -> Result<Parsed<Self::Entry>, EntryError>;
}

/// Fields of a `<sitemap>` element in a sitemap-index document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIndexEntry {
    pub loc: String,
    pub lastmod: String,
}

/// Fields of a `<url>` element in a urlset document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawUrlEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: String,
    pub priority: String,
}

impl RawEntry for RawIndexEntry {
    type Entry = IndexEntry;
    const ELEMENT: &'static str = "sitemap";

    fn set_field(&mut self, name: &[u8], value: String) {
        match name {
            b"loc" => self.loc = value,
            b"lastmod" => self.lastmod = value,
            _ => {}
        }
    }

    fn parse(self) -> Result<Parsed<IndexEntry>, EntryError> {
        let location = hard_location(&self.loc)?;
        let mut anomalies = Vec::new();

        let last_modified = parse_last_modified(&self.lastmod).unwrap_or_else(|anomaly| {
            anomalies.push(anomaly);
            None
        });

        let warning = soft_warning(&location, anomalies);
        Ok(Parsed {
            entry: IndexEntry::new(location, last_modified),
            warning,
        })
    }
}

impl RawEntry for RawUrlEntry {
    type Entry = PageEntry;
    const ELEMENT: &'static str = "url";

    fn set_field(&mut self, name: &[u8], value: String) {
        match name {
            b"loc" => self.loc = value,
            b"lastmod" => self.lastmod = value,
            b"changefreq" => self.changefreq = value,
            b"priority" => self.priority = value,
            _ => {}
        }
    }

    fn parse(self) -> Result<Parsed<PageEntry>, EntryError> {
        let location = hard_location(&self.loc)?;
        let mut anomalies = Vec::new();

        let last_modified = parse_last_modified(&self.lastmod).unwrap_or_else(|anomaly| {
            anomalies.push(anomaly);
            None
        });

        let change_frequency = self.changefreq.trim().to_string();
        anomalies.extend(check_change_frequency(&change_frequency));

        let priority = parse_priority(&self.priority).unwrap_or_else(|anomaly| {
            anomalies.push(anomaly);
            crate::entry::DEFAULT_PRIORITY
        });

        let warning = soft_warning(&location, anomalies);
        Ok(Parsed {
            entry: PageEntry::new(location, last_modified, change_frequency, priority),
            warning,
        })
    }
}

fn hard_location(raw: &str) -> Result<Url, EntryError> {
    parse_location(raw).map_err(|source| EntryError::Hard {
        location: raw.trim().to_string(),
        source,
    })
}

fn soft_warning(location: &Url, anomalies: Vec<FieldAnomaly>) -> Option<EntryError> {
    if anomalies.is_empty() {
        return None;
    }
    Some(EntryError::Soft {
        location: location.clone(),
        anomalies,
    })
}
