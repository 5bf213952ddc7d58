//! XML sitemap iterators
//!
//! Both XML encodings are scanned the same way: pull tokens one at a time, skip
//! everything that is not the start of the entry element (matched by local
//! name, so any namespace prefix is ignored), then decode that element's
//! direct children into a raw entry shape. Whitespace, comments, processing
//! instructions and unrelated elements never stop the scan, and the document is
//! never loaded as a whole.

use crate::entry::{Parsed, RawEntry, RawIndexEntry, RawUrlEntry};
use crate::iterator::{validate_new_iterator, CursorState, SitemapIterator};
use crate::{Result, SitemapError};
use quick_xml::errors::IllFormedError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::marker::PhantomData;

/// Iterator over the `<sitemap>` entries of a sitemap-index document
pub type XmlIndexIterator<R> = XmlEntryIterator<R, RawIndexEntry>;

/// Iterator over the `<url>` entries of a urlset document
pub type XmlPageIterator<R> = XmlEntryIterator<R, RawUrlEntry>;

/// Streaming XML iterator producing one entity per `E::ELEMENT` element
pub struct XmlEntryIterator<R, E: RawEntry> {
    /// Always `Some` outside of `reset()`
    decoder: Option<Reader<BufReader<R>>>,
    buf: Vec<u8>,
    field_buf: Vec<u8>,
    /// Cleared once any entry element has been matched since the last reset
    nothing_matched: bool,
    /// Qualified names of the enclosing elements still open, outermost first
    open_elements: Vec<String>,
    state: CursorState<E::Entry>,
    _raw: PhantomData<E>,
}

impl<R: Read + Seek, E: RawEntry> XmlEntryIterator<R, E> {
    /// Creates an iterator positioned at the start of `reader`
    ///
    /// The stream is probed once (see `validate_new_iterator`) and rewound, so
    /// a document with no entry element, malformed XML ahead of the first
    /// entry, or an unusable first location fails here.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use sumi_sitemap::{SitemapIterator, XmlIndexIterator};
    ///
    /// let xml = r#"<sitemapindex><sitemap><loc>https://example.com/a.xml</loc></sitemap></sitemapindex>"#;
    /// let mut it = XmlIndexIterator::new(Cursor::new(xml)).unwrap();
    /// assert!(it.advance());
    /// assert_eq!(it.current_item().unwrap().location().as_str(), "https://example.com/a.xml");
    /// assert!(!it.advance());
    /// assert!(it.last_error().is_none());
    /// ```
    pub fn new(reader: R) -> Result<Self> {
        let mut iterator = Self {
            decoder: Some(build_decoder(BufReader::new(reader))),
            buf: Vec::new(),
            field_buf: Vec::new(),
            nothing_matched: true,
            open_elements: Vec::new(),
            state: CursorState::new(),
            _raw: PhantomData,
        };
        validate_new_iterator(&mut iterator)?;
        tracing::debug!("Opened XML sitemap stream of <{}> entries", E::ELEMENT);
        Ok(iterator)
    }

    /// Pulls tokens until the next entry element and decodes it
    ///
    /// `Ok(None)` is a clean end of input after at least one entry element
    /// with every enclosing element closed.
    fn next_element(&mut self) -> Result<Option<E>> {
        // Unreachable: reset() puts the decoder back before it returns
        let decoder = self.decoder.as_mut().ok_or_else(|| {
            SitemapError::Configuration("XML decoder lost by an interrupted reset".to_string())
        })?;

        loop {
            self.buf.clear();
            let event = decoder
                .read_event_into(&mut self.buf)
                .map_err(|source| decode_error(decoder, source))?;

            match event {
                Event::Start(start) if start.local_name().as_ref() == E::ELEMENT.as_bytes() => {
                    self.nothing_matched = false;
                    return read_fields::<_, E>(decoder, &mut self.field_buf).map(Some);
                }
                Event::Empty(start) if start.local_name().as_ref() == E::ELEMENT.as_bytes() => {
                    self.nothing_matched = false;
                    return Ok(Some(E::default()));
                }
                Event::Start(start) => {
                    self.open_elements
                        .push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                }
                Event::End(_) => {
                    self.open_elements.pop();
                }
                Event::Eof if self.nothing_matched => {
                    return Err(SitemapError::EmptyDocument {
                        element: E::ELEMENT,
                    });
                }
                Event::Eof => {
                    return match self.open_elements.pop() {
                        Some(name) => Err(decode_error(
                            decoder,
                            IllFormedError::MissingEndTag(name).into(),
                        )),
                        None => Ok(None),
                    };
                }
                _ => {}
            }
        }
    }
}

impl<R: Read + Seek, E: RawEntry> SitemapIterator for XmlEntryIterator<R, E> {
    type Item = E::Entry;

    fn advance(&mut self) -> bool {
        if self.state.is_halted() {
            return self.state.stay_halted();
        }

        match self.next_element() {
            Ok(Some(raw)) => match raw.parse() {
                Ok(Parsed { entry, warning }) => {
                    if let Some(warning) = &warning {
                        tracing::warn!("{}", warning);
                    }
                    self.state.produce(entry, warning.map(SitemapError::from))
                }
                Err(hard) => {
                    tracing::debug!("Halting <{}> stream: {}", E::ELEMENT, hard);
                    self.state.fail(hard.into())
                }
            },
            Ok(None) => self.state.end(),
            Err(err) => {
                tracing::debug!("Halting <{}> stream: {}", E::ELEMENT, err);
                self.state.fail(err)
            }
        }
    }

    fn last_error(&self) -> Option<&SitemapError> {
        self.state.error()
    }

    fn current_item(&self) -> Option<&E::Entry> {
        self.state.item()
    }

    fn reset(&mut self) -> Result<()> {
        self.state.clear();
        self.nothing_matched = true;
        self.open_elements.clear();
        self.buf.clear();
        self.field_buf.clear();

        // Unreachable: every path below restores the decoder
        let decoder = self.decoder.take().ok_or_else(|| {
            SitemapError::Configuration("XML decoder lost by an interrupted reset".to_string())
        })?;
        let mut stream = decoder.into_inner();
        let rewound = stream.seek(SeekFrom::Start(0));
        self.decoder = Some(build_decoder(stream));

        rewound.map(|_| ()).map_err(SitemapError::Rewind)
    }

    fn take_item(&mut self) -> Option<E::Entry> {
        self.state.take_item()
    }

    fn take_error(&mut self) -> Option<SitemapError> {
        self.state.take_error()
    }
}

fn build_decoder<B: BufRead>(stream: B) -> Reader<B> {
    let mut decoder = Reader::from_reader(stream);
    decoder.config_mut().check_end_names = true;
    decoder
}

fn decode_error<B>(decoder: &Reader<B>, source: quick_xml::Error) -> SitemapError {
    SitemapError::Decode {
        position: decoder.buffer_position(),
        source,
    }
}

/// Decodes the subtree of an entry element whose start tag was just read
///
/// Only direct children count: the text of `<loc>` inside the entry is kept,
/// the text of `<image:loc>` nested one level deeper is not.
fn read_fields<B: BufRead, E: RawEntry>(decoder: &mut Reader<B>, buf: &mut Vec<u8>) -> Result<E> {
    let mut raw = E::default();
    let mut depth = 0usize;
    let mut field: Option<Vec<u8>> = None;
    let mut text = String::new();

    loop {
        buf.clear();
        let event = decoder
            .read_event_into(buf)
            .map_err(|source| decode_error(decoder, source))?;

        match event {
            Event::Start(start) => {
                depth += 1;
                if depth == 1 {
                    field = Some(start.local_name().as_ref().to_vec());
                    text.clear();
                }
            }
            Event::Empty(start) if depth == 0 => {
                raw.set_field(start.local_name().as_ref(), String::new());
            }
            Event::Text(content) if depth == 1 => {
                let unescaped = content
                    .unescape()
                    .map_err(|source| decode_error(decoder, source))?;
                text.push_str(&unescaped);
            }
            Event::CData(content) if depth == 1 => {
                text.push_str(&String::from_utf8_lossy(&content));
            }
            Event::End(_) if depth == 0 => return Ok(raw),
            Event::End(_) => {
                if depth == 1 {
                    if let Some(name) = field.take() {
                        raw.set_field(&name, std::mem::take(&mut text));
                    }
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(SitemapError::Truncated {
                    element: E::ELEMENT,
                })
            }
            _ => {}
        }
    }
}
