//! Plain-text sitemap iterator
//!
//! A plain-text sitemap lists one absolute URL per line. Every line either
//! yields a page entry with default metadata or ends the stream; there is no
//! soft-error path for this format.

use crate::entry::PageEntry;
use crate::iterator::{validate_new_iterator, CursorState, SitemapIterator};
use crate::url::parse_location;
use crate::{EntryError, Result, SitemapError};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Longest line accepted by default, in bytes, excluding the line break
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Iterator over a newline-delimited URL list
pub struct PlainPageIterator<R> {
    lines: BufReader<R>,
    line: String,
    max_line_length: usize,
    state: CursorState<PageEntry>,
}

impl<R: Read + Seek> PlainPageIterator<R> {
    /// Creates an iterator with the default line length limit
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use sumi_sitemap::{PlainPageIterator, SitemapIterator};
    ///
    /// let mut it = PlainPageIterator::new(Cursor::new("https://a.example/\n")).unwrap();
    /// assert!(it.advance());
    /// assert_eq!(it.current_item().unwrap().priority(), 1.0);
    /// assert!(!it.advance());
    /// assert!(it.last_error().is_none());
    /// ```
    pub fn new(reader: R) -> Result<Self> {
        Self::with_max_line_length(reader, DEFAULT_MAX_LINE_LENGTH)
    }

    /// Creates an iterator rejecting lines longer than `max_line_length` bytes
    ///
    /// The first line is probed and the stream rewound, so an unusable first
    /// line or an unreadable stream fails here. An empty stream does not.
    pub fn with_max_line_length(reader: R, max_line_length: usize) -> Result<Self> {
        if max_line_length == 0 {
            return Err(SitemapError::Configuration(
                "max_line_length must be at least 1".to_string(),
            ));
        }

        let mut iterator = Self {
            lines: BufReader::new(reader),
            line: String::new(),
            max_line_length,
            state: CursorState::new(),
        };
        validate_new_iterator(&mut iterator)?;
        tracing::debug!("Opened plain-text sitemap stream");
        Ok(iterator)
    }

    /// Reads the next line into `self.line` without its line break
    ///
    /// Returns false at end of input.
    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();

        // Room for the longest allowed line plus "\r\n"
        let limit = self.max_line_length as u64 + 2;
        let read = (&mut self.lines)
            .take(limit)
            .read_line(&mut self.line)
            .map_err(SitemapError::LineRead)?;
        if read == 0 {
            return Ok(false);
        }

        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }

        if self.line.len() > self.max_line_length {
            return Err(SitemapError::LineRead(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds {} bytes", self.max_line_length),
            )));
        }

        Ok(true)
    }
}

impl<R: Read + Seek> SitemapIterator for PlainPageIterator<R> {
    type Item = PageEntry;

    fn advance(&mut self) -> bool {
        if self.state.is_halted() {
            return self.state.stay_halted();
        }

        match self.next_line() {
            Ok(true) => {}
            Ok(false) => return self.state.end(),
            Err(err) => {
                tracing::debug!("Halting plain-text stream: {}", err);
                return self.state.fail(err);
            }
        }

        match parse_location(&self.line) {
            Ok(location) => self.state.produce(PageEntry::from_location(location), None),
            Err(source) => {
                let err = EntryError::Hard {
                    location: self.line.trim().to_string(),
                    source,
                };
                tracing::debug!("Halting plain-text stream: {}", err);
                self.state.fail(err.into())
            }
        }
    }

    fn last_error(&self) -> Option<&SitemapError> {
        self.state.error()
    }

    fn current_item(&self) -> Option<&PageEntry> {
        self.state.item()
    }

    fn reset(&mut self) -> Result<()> {
        self.state.clear();
        self.line.clear();
        // BufReader drops its buffer on seek
        self.lines
            .seek(SeekFrom::Start(0))
            .map(|_| ())
            .map_err(SitemapError::Rewind)
    }

    fn take_item(&mut self) -> Option<PageEntry> {
        self.state.take_item()
    }

    fn take_error(&mut self) -> Option<SitemapError> {
        self.state.take_error()
    }
}
