//! Sitemap iterators
//!
//! Every sitemap encoding is read through the same forward-only, rewindable
//! cursor contract:
//!
//! - `advance()` tries to produce the next entry and reports whether one is
//!   now available
//! - `last_error()` describes what happened during that `advance()`
//! - `current_item()` holds the entry produced by that `advance()`
//! - `reset()` rewinds the stream and forgets all state
//!
//! `advance()` returning false with no error is a clean end of stream; false
//! with an error is a terminal failure. `advance()` returning true with an error
//! means the entry was produced but carries a soft diagnostic, so callers must
//! look at `last_error()` even on success.
//!
//! # Components
//!
//! - `XmlIndexIterator`: `<sitemap>` entries of a sitemap-index document
//! - `XmlPageIterator`: `<url>` entries of a urlset document
//! - `PlainPageIterator`: one URL per line
//! - `Entries`: adapts any of them into a std `Iterator`

mod plain;
mod xml;

pub use plain::{PlainPageIterator, DEFAULT_MAX_LINE_LENGTH};
pub use xml::{XmlEntryIterator, XmlIndexIterator, XmlPageIterator};

use crate::{Result, SitemapError};

/// Forward-only, rewindable cursor over the entries of one sitemap stream
///
/// Implementations are single-threaded and may block for as long as the
/// underlying stream blocks. They never close the stream; pass `&mut R` to keep
/// ownership of it.
pub trait SitemapIterator {
    /// The entity this iterator produces
    type Item;

    /// Attempts to produce the next entry
    ///
    /// Returns true iff `current_item()` now holds an entry.
    fn advance(&mut self) -> bool;

    /// The error raised by the last `advance()`, if any
    fn last_error(&self) -> Option<&SitemapError>;

    /// The entry produced by the last successful `advance()`
    fn current_item(&self) -> Option<&Self::Item>;

    /// Rewinds the stream to its start and clears the current entry and error
    ///
    /// All scanning state is rebuilt even when repositioning the stream fails;
    /// the failure is reported as `SitemapError::Rewind`.
    fn reset(&mut self) -> Result<()>;

    /// Moves the current entry out, leaving none behind
    fn take_item(&mut self) -> Option<Self::Item>;

    /// Moves the last error out, leaving none behind
    fn take_error(&mut self) -> Option<SitemapError>;

    /// Consumes the cursor into a std `Iterator`
    fn entries(self) -> Entries<Self>
    where
        Self: Sized,
    {
        Entries::new(self)
    }
}

/// Probes a freshly built iterator once, then rewinds it
///
/// This surfaces unreadable or structurally empty input at construction time
/// while handing back an iterator that behaves as if `advance()` had never been
/// called.
///
/// # Cost
///
/// The probe reads the stream up to the end of the first entry. For an XML
/// document with no matching element that is the whole document. The same prefix
/// is read again by the caller's first `advance()`.
///
/// # Precedence
///
/// If the probe fails with an error, that error is returned; a rewind failure
/// on the same path is logged and dropped. If the probe succeeds or ends
/// cleanly, a rewind failure is returned.
pub(crate) fn validate_new_iterator<I: SitemapIterator>(iterator: &mut I) -> Result<()> {
    let probe_error = if iterator.advance() {
        None
    } else {
        iterator.take_error()
    };

    let rewound = iterator.reset();

    match (probe_error, rewound) {
        (Some(err), Ok(())) => Err(err),
        (Some(err), Err(rewind)) => {
            tracing::warn!("Rewind after failed probe also failed: {}", rewind);
            Err(err)
        }
        (None, result) => result,
    }
}

/// Per-advance cursor state shared by every iterator
#[derive(Debug)]
pub(crate) struct CursorState<T> {
    item: Option<T>,
    error: Option<SitemapError>,
    halted: bool,
}

impl<T> CursorState<T> {
    pub(crate) fn new() -> Self {
        Self {
            item: None,
            error: None,
            halted: false,
        }
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted
    }

    /// A terminal failure was already reported; keep reporting it
    pub(crate) fn stay_halted(&mut self) -> bool {
        self.item = None;
        false
    }

    pub(crate) fn produce(&mut self, item: T, warning: Option<SitemapError>) -> bool {
        self.item = Some(item);
        self.error = warning;
        true
    }

    pub(crate) fn end(&mut self) -> bool {
        self.item = None;
        self.error = None;
        false
    }

    pub(crate) fn fail(&mut self, error: SitemapError) -> bool {
        self.item = None;
        self.error = Some(error);
        self.halted = true;
        false
    }

    pub(crate) fn clear(&mut self) {
        self.item = None;
        self.error = None;
        self.halted = false;
    }

    pub(crate) fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    pub(crate) fn error(&self) -> Option<&SitemapError> {
        self.error.as_ref()
    }

    pub(crate) fn take_item(&mut self) -> Option<T> {
        self.item.take()
    }

    pub(crate) fn take_error(&mut self) -> Option<SitemapError> {
        self.error.take()
    }
}

/// An entry together with the soft error it was produced with
#[derive(Debug)]
pub struct Discovered<T> {
    pub entry: T,
    pub warning: Option<SitemapError>,
}

/// std `Iterator` view of a `SitemapIterator`
///
/// Yields `Ok` for every produced entry and at most one `Err`, after which it
/// is exhausted.
#[derive(Debug)]
pub struct Entries<I> {
    inner: I,
    done: bool,
}

impl<I: SitemapIterator> Entries<I> {
    pub fn new(inner: I) -> Self {
        Self { inner, done: false }
    }

    /// Gives the cursor back, e.g. to `reset()` it
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: SitemapIterator> Iterator for Entries<I> {
    type Item = Result<Discovered<I::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.inner.advance() {
            let warning = self.inner.take_error();
            return self
                .inner
                .take_item()
                .map(|entry| Ok(Discovered { entry, warning }));
        }

        self.done = true;
        self.inner.take_error().map(Err)
    }
}
