//! Sitemap sources
//!
//! This module picks the right iterator for a stream: either the caller names
//! the encoding, or it is sniffed from the first bytes of the stream.

use crate::entry::PageEntry;
use crate::iterator::{
    PlainPageIterator, SitemapIterator, XmlIndexIterator, XmlPageIterator,
    DEFAULT_MAX_LINE_LENGTH,
};
use crate::{Result, SitemapError};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::str::FromStr;

/// How many leading bytes `detect_format` looks at
const SNIFF_LEN: usize = 4096;

/// The three sitemap encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitemapFormat {
    /// XML `<sitemapindex>` listing other sitemaps
    Index,
    /// XML `<urlset>` listing pages
    Urlset,
    /// One URL per line
    Text,
}

impl SitemapFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Urlset => "urlset",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for SitemapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SitemapFormat {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "index" | "sitemapindex" => Ok(Self::Index),
            "urlset" | "xml" => Ok(Self::Urlset),
            "text" | "txt" | "plain" => Ok(Self::Text),
            other => Err(SitemapError::Configuration(format!(
                "Unknown sitemap format: {}",
                other
            ))),
        }
    }
}

/// Guesses the encoding of a stream from its first bytes, then rewinds it
///
/// # Detection Rules
///
/// 1. Skip a UTF-8 byte order mark and leading whitespace
/// 2. Anything not starting with `<` is plain text
/// 3. Past the XML declaration, comments, processing instructions and any
///    doctype, a root element named `sitemapindex` (namespace prefix ignored)
///    is an index; any other XML is a urlset
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use sumi_sitemap::{detect_format, SitemapFormat};
///
/// let mut stream = Cursor::new("<?xml version=\"1.0\"?><sitemapindex></sitemapindex>");
/// assert_eq!(detect_format(&mut stream).unwrap(), SitemapFormat::Index);
/// assert_eq!(stream.position(), 0);
/// ```
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<SitemapFormat> {
    let mut head = vec![0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < head.len() {
        match reader.read(&mut head[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    head.truncate(filled);

    reader
        .seek(SeekFrom::Start(0))
        .map_err(SitemapError::Rewind)?;

    let content = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&head);
    let start = content
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(content.len());
    let content = &content[start..];

    let format = if !content.starts_with(b"<") {
        SitemapFormat::Text
    } else if root_local_name(content) == Some(&b"sitemapindex"[..]) {
        SitemapFormat::Index
    } else {
        SitemapFormat::Urlset
    };

    tracing::debug!("Detected sitemap format: {}", format);
    Ok(format)
}

/// Local name of the first element tag in `content`, if the sniffed bytes
/// reach one
fn root_local_name(mut content: &[u8]) -> Option<&[u8]> {
    loop {
        let start = content
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(content.len());
        content = &content[start..];
        if content.starts_with(b"<?") {
            content = skip_past(content, b"?>")?;
        } else if content.starts_with(b"<!--") {
            content = skip_past(content, b"-->")?;
        } else if content.starts_with(b"<!") {
            content = skip_past(content, b">")?;
        } else if let Some(tag) = content.strip_prefix(b"<") {
            let end = tag
                .iter()
                .position(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
                .unwrap_or(tag.len());
            let name = &tag[..end];
            let local = match name.iter().rposition(|&b| b == b':') {
                Some(colon) => &name[colon + 1..],
                None => name,
            };
            return Some(local);
        } else {
            return None;
        }
    }
}

fn skip_past<'a>(content: &'a [u8], terminator: &[u8]) -> Option<&'a [u8]> {
    content
        .windows(terminator.len())
        .position(|window| window == terminator)
        .map(|at| &content[at + terminator.len()..])
}

/// Page iterator over either a urlset document or a plain-text list
pub enum PageIterator<R> {
    Xml(XmlPageIterator<R>),
    Plain(PlainPageIterator<R>),
}

impl<R: Read + Seek> SitemapIterator for PageIterator<R> {
    type Item = PageEntry;

    fn advance(&mut self) -> bool {
        match self {
            Self::Xml(it) => it.advance(),
            Self::Plain(it) => it.advance(),
        }
    }

    fn last_error(&self) -> Option<&SitemapError> {
        match self {
            Self::Xml(it) => it.last_error(),
            Self::Plain(it) => it.last_error(),
        }
    }

    fn current_item(&self) -> Option<&PageEntry> {
        match self {
            Self::Xml(it) => it.current_item(),
            Self::Plain(it) => it.current_item(),
        }
    }

    fn reset(&mut self) -> Result<()> {
        match self {
            Self::Xml(it) => it.reset(),
            Self::Plain(it) => it.reset(),
        }
    }

    fn take_item(&mut self) -> Option<PageEntry> {
        match self {
            Self::Xml(it) => it.take_item(),
            Self::Plain(it) => it.take_item(),
        }
    }

    fn take_error(&mut self) -> Option<SitemapError> {
        match self {
            Self::Xml(it) => it.take_error(),
            Self::Plain(it) => it.take_error(),
        }
    }
}

/// An opened sitemap of either kind
pub enum SitemapStream<R> {
    Index(XmlIndexIterator<R>),
    Pages(PageIterator<R>),
}

/// Builder for sitemap iterators
///
/// A source without a reader cannot be opened; that is reported as
/// `SitemapError::Configuration` rather than producing an iterator.
#[derive(Debug)]
pub struct SitemapSource<R> {
    reader: Option<R>,
    format: Option<SitemapFormat>,
    max_line_length: usize,
}

impl<R> Default for SitemapSource<R> {
    fn default() -> Self {
        Self {
            reader: None,
            format: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl<R: Read + Seek> SitemapSource<R> {
    /// Creates a source with no reader and format detection enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source reading from `reader`
    pub fn from_reader(reader: R) -> Self {
        Self::default().reader(reader)
    }

    pub fn reader(mut self, reader: R) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Fixes the encoding; without it the stream is sniffed
    pub fn format(mut self, format: SitemapFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Line length limit for plain-text streams
    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Opens whichever iterator the format calls for
    pub fn open(self) -> Result<SitemapStream<R>> {
        let (mut reader, format, max_line_length) = self.into_parts()?;
        let format = match format {
            Some(format) => format,
            None => detect_format(&mut reader)?,
        };

        match format {
            SitemapFormat::Index => Ok(SitemapStream::Index(XmlIndexIterator::new(reader)?)),
            SitemapFormat::Urlset => Ok(SitemapStream::Pages(PageIterator::Xml(
                XmlPageIterator::new(reader)?,
            ))),
            SitemapFormat::Text => Ok(SitemapStream::Pages(PageIterator::Plain(
                PlainPageIterator::with_max_line_length(reader, max_line_length)?,
            ))),
        }
    }

    /// Opens a sitemap-index iterator
    pub fn open_index(self) -> Result<XmlIndexIterator<R>> {
        match self.open()? {
            SitemapStream::Index(it) => Ok(it),
            SitemapStream::Pages(_) => Err(SitemapError::Configuration(
                "Expected a sitemap index, found a page list".to_string(),
            )),
        }
    }

    /// Opens a page iterator over a urlset document or a plain-text list
    pub fn open_pages(self) -> Result<PageIterator<R>> {
        match self.open()? {
            SitemapStream::Pages(it) => Ok(it),
            SitemapStream::Index(_) => Err(SitemapError::Configuration(
                "Expected a page list, found a sitemap index".to_string(),
            )),
        }
    }

    fn into_parts(self) -> Result<(R, Option<SitemapFormat>, usize)> {
        let reader = self.reader.ok_or_else(|| {
            SitemapError::Configuration("Sitemap reader cannot be absent".to_string())
        })?;
        Ok((reader, self.format, self.max_line_length))
    }
}
