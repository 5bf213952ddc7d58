//! Integration tests for the sitemap iterators
//!
//! These tests drive the public API end-to-end over in-memory and file-backed
//! streams.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use sumi_sitemap::source::SitemapStream;
use sumi_sitemap::{
    EntryError, PlainPageIterator, SitemapError, SitemapFormat, SitemapIterator, SitemapSource,
    XmlIndexIterator, XmlPageIterator,
};
use tempfile::NamedTempFile;

const INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap>
    <loc>https://example.com/sitemap-pages.xml</loc>
    <lastmod>2024-05-01T12:00:00+00:00</lastmod>
  </sitemap>
  <sitemap>
    <loc>https://example.com/sitemap-posts.xml</loc>
  </sitemap>
</sitemapindex>"#;

const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/</loc>
    <lastmod>2024-05-01</lastmod>
    <changefreq>daily</changefreq>
    <priority>0.9</priority>
  </url>
  <url>
    <loc>https://example.com/about</loc>
    <priority>2.5</priority>
  </url>
  <url>
    <loc>https://example.com/contact</loc>
  </url>
</urlset>"#;

/// One observed advance(): result, current location, error text
type Step = (bool, Option<String>, Option<String>);

fn record<I, F>(it: &mut I, steps: usize, location: F) -> Vec<Step>
where
    I: SitemapIterator,
    F: Fn(&I::Item) -> String,
{
    (0..steps)
        .map(|_| {
            let ok = it.advance();
            (
                ok,
                it.current_item().map(&location),
                it.last_error().map(ToString::to_string),
            )
        })
        .collect()
}

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Stream whose seeks start failing once `allowed_seeks` is used up
struct FlakySeek {
    inner: Cursor<Vec<u8>>,
    allowed_seeks: usize,
}

impl Read for FlakySeek {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for FlakySeek {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.allowed_seeks == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "stream closed"));
        }
        self.allowed_seeks -= 1;
        self.inner.seek(pos)
    }
}

#[test]
fn test_index_document_end_to_end() {
    let mut it = XmlIndexIterator::new(Cursor::new(INDEX)).unwrap();

    assert!(it.advance());
    assert!(it.last_error().is_none());
    let first = it.current_item().unwrap();
    assert_eq!(
        first.location().as_str(),
        "https://example.com/sitemap-pages.xml"
    );
    assert!(first.last_modified().is_some());

    assert!(it.advance());
    let second = it.take_item().unwrap();
    assert_eq!(
        second.location().as_str(),
        "https://example.com/sitemap-posts.xml"
    );
    assert_eq!(second.last_modified(), None);

    assert!(!it.advance());
    assert!(it.last_error().is_none());
    assert!(it.current_item().is_none());
}

#[test]
fn test_urlset_document_end_to_end() {
    let mut it = XmlPageIterator::new(Cursor::new(URLSET)).unwrap();

    assert!(it.advance());
    assert!(it.last_error().is_none());
    let home = it.current_item().unwrap();
    assert_eq!(home.change_frequency(), "daily");
    assert_eq!(home.priority(), 0.9);

    // Out-of-range priority: item produced, defaulted, soft error attached
    assert!(it.advance());
    assert_eq!(it.current_item().unwrap().priority(), 1.0);
    match it.last_error() {
        Some(SitemapError::Entry(EntryError::Soft {
            location,
            anomalies,
        })) => {
            assert_eq!(location.as_str(), "https://example.com/about");
            assert_eq!(anomalies.len(), 1);
        }
        other => panic!("expected soft error, got {other:?}"),
    }

    assert!(it.advance());
    assert!(it.last_error().is_none());
    assert_eq!(
        it.current_item().unwrap().location().as_str(),
        "https://example.com/contact"
    );

    assert!(!it.advance());
    assert!(it.last_error().is_none());
}

#[test]
fn test_plain_text_stops_at_bad_line() {
    let mut it = PlainPageIterator::new(Cursor::new(
        "https://a.example/\nnot a url\nhttps://b.example/\n",
    ))
    .unwrap();

    assert!(it.advance());
    let entry = it.current_item().unwrap();
    assert_eq!(entry.location().host_str(), Some("a.example"));
    assert_eq!(entry.priority(), 1.0);

    assert!(!it.advance());
    assert!(matches!(
        it.last_error(),
        Some(SitemapError::Entry(EntryError::Hard { .. }))
    ));
    assert!(!it.advance());
    assert!(it.current_item().is_none());
}

#[test]
fn test_reset_replays_like_a_fresh_iterator() {
    // k items consumed, then k + 1 advances after reset
    for k in 0..4 {
        let mut fresh = XmlPageIterator::new(Cursor::new(URLSET)).unwrap();
        let expected = record(&mut fresh, k + 1, |e| e.location().to_string());

        let mut used = XmlPageIterator::new(Cursor::new(URLSET)).unwrap();
        record(&mut used, k, |e| e.location().to_string());
        used.reset().unwrap();
        let replay = record(&mut used, k + 1, |e| e.location().to_string());

        assert_eq!(replay, expected, "replay differs after consuming {k} items");
    }

    let text = "https://a.example/\nhttps://b.example/\nbroken\n";
    for k in 0..3 {
        let mut fresh = PlainPageIterator::new(Cursor::new(text)).unwrap();
        let expected = record(&mut fresh, k + 1, |e| e.location().to_string());

        let mut used = PlainPageIterator::new(Cursor::new(text)).unwrap();
        record(&mut used, k, |e| e.location().to_string());
        used.reset().unwrap();
        let replay = record(&mut used, k + 1, |e| e.location().to_string());

        assert_eq!(replay, expected, "replay differs after consuming {k} items");
    }

    for k in 0..3 {
        let mut fresh = XmlIndexIterator::new(Cursor::new(INDEX)).unwrap();
        let expected = record(&mut fresh, k + 1, |e| e.location().to_string());

        let mut used = XmlIndexIterator::new(Cursor::new(INDEX)).unwrap();
        record(&mut used, k, |e| e.location().to_string());
        used.reset().unwrap();
        let replay = record(&mut used, k + 1, |e| e.location().to_string());

        assert_eq!(replay, expected, "replay differs after consuming {k} items");
    }
}

#[test]
fn test_empty_xml_fails_construction() {
    let err = XmlIndexIterator::new(Cursor::new("<sitemapindex/>"))
        .err()
        .unwrap();
    assert!(matches!(err, SitemapError::EmptyDocument { .. }));

    let err = XmlPageIterator::new(Cursor::new(
        "<?xml version=\"1.0\"?><!-- nothing here --><urlset></urlset>",
    ))
    .err()
    .unwrap();
    assert!(matches!(err, SitemapError::EmptyDocument { .. }));
}

#[test]
fn test_rewind_failure_during_construction() {
    // The single seek performed by construction's reset fails
    let stream = FlakySeek {
        inner: Cursor::new(URLSET.as_bytes().to_vec()),
        allowed_seeks: 0,
    };
    let err = XmlPageIterator::new(stream).err().unwrap();
    assert!(matches!(err, SitemapError::Rewind(_)));
}

#[test]
fn test_rewind_failure_after_construction() {
    let stream = FlakySeek {
        inner: Cursor::new(URLSET.as_bytes().to_vec()),
        allowed_seeks: 1,
    };
    let mut it = XmlPageIterator::new(stream).unwrap();
    assert!(it.advance());

    let err = it.reset().unwrap_err();
    assert!(matches!(err, SitemapError::Rewind(_)));
    assert!(it.current_item().is_none());
    assert!(it.last_error().is_none());
}

#[test]
fn test_file_backed_stream_is_not_consumed() {
    let file = temp_file(URLSET);
    let mut handle = File::open(file.path()).unwrap();

    {
        let mut it = XmlPageIterator::new(&mut handle).unwrap();
        let mut count = 0;
        while it.advance() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    // The caller still owns the handle and can reposition it
    handle.seek(SeekFrom::Start(0)).unwrap();
    let mut content = String::new();
    handle.read_to_string(&mut content).unwrap();
    assert_eq!(content, URLSET);
}

#[test]
fn test_source_detects_each_format() {
    let index = temp_file(INDEX);
    match SitemapSource::from_reader(File::open(index.path()).unwrap())
        .open()
        .unwrap()
    {
        SitemapStream::Index(it) => assert_eq!(it.entries().count(), 2),
        SitemapStream::Pages(_) => panic!("index detected as page list"),
    }

    let urlset = temp_file(URLSET);
    let pages = SitemapSource::from_reader(File::open(urlset.path()).unwrap())
        .open_pages()
        .unwrap();
    let warnings = pages
        .entries()
        .map(|r| r.unwrap())
        .filter(|d| d.warning.is_some())
        .count();
    assert_eq!(warnings, 1);

    let text = temp_file("https://a.example/\nhttps://b.example/\n");
    let mut handle = File::open(text.path()).unwrap();
    assert_eq!(
        sumi_sitemap::detect_format(&mut handle).unwrap(),
        SitemapFormat::Text
    );
    let locations: Vec<String> = SitemapSource::from_reader(handle)
        .open_pages()
        .unwrap()
        .entries()
        .map(|r| r.unwrap().entry.location().to_string())
        .collect();
    assert_eq!(locations, vec!["https://a.example/", "https://b.example/"]);
}

#[test]
fn test_entries_stop_after_terminal_error() {
    let it = XmlPageIterator::new(Cursor::new(
        "<urlset><url><loc>https://a.example/</loc></url><url><loc>nope</loc></url><url><loc>https://c.example/</loc></url></urlset>",
    ))
    .unwrap();

    let results: Vec<_> = it.entries().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(SitemapError::Entry(EntryError::Hard { .. }))
    ));
}
