//! # Head Scanner
//!
//! Streams an HTML document through the quick-xml reader and folds the tags of
//! its head section into a [`Page`].
//!
//! ## Key Components
//!
//! - `parse`: Drives the reader over any `std::io::Read`
//! - `tags`: Typed `<meta>` / `<link>` descriptors built from tag attributes
//! - `aggregate`: The ordered dispatch table that applies descriptors to a page
//! - `dates`: Lenient timestamp parsing for the date-valued properties
//!
//! ## Scanning Rules
//!
//! - The text directly after `<title>` becomes the page title, unless a title was
//!   already captured
//! - `<meta>` and `<link>` tags, self-closing or not, are contributed as they arrive
//!   with every attribute in source order, repeats included
//! - `</head>` ends the scan, as does end of stream
//! - A contribution error (malformed integer) aborts the scan
//!
//! Script, style and similar raw-text elements are skipped up to their end tag
//! so their content never yields tags.

mod aggregate;
mod dates;
mod tags;

pub use tags::{Link, Meta};

use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::sync::Arc;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::page::Page;

/// Capacity of the buffer between the byte stream and the markup reader
const CHUNK_SIZE: usize = 8 * 1024;

/// Elements whose content is text up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "title", "textarea", "script", "style", "noscript", "noframes", "noembed", "iframe", "xmp",
];

/// Scan the head section of the document in `reader`, updating `page` in place
pub fn parse<R: Read>(page: &mut Page, reader: R) -> Result<()> {
    let mut reader = Reader::from_reader(BufReader::with_capacity(CHUNK_SIZE, reader));
    reader.config_mut().check_end_names = false;
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(quick_xml::Error::Io(err)) => return Err(Error::Stream(into_io_error(err))),
            Err(err) => {
                debug!(error = %err, "unterminated markup at end of stream");
                return Ok(());
            }
        };

        match event {
            Event::Start(tag) => {
                let name = tag_name(&tag);
                contribute(page, &name, &tag)?;
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    let text = read_raw_text(reader.get_mut(), &name)?;
                    if name == "title" {
                        capture_title(page, &text);
                    }
                }
            }
            Event::Empty(tag) => {
                let name = tag_name(&tag);
                contribute(page, &name, &tag)?;
            }
            Event::End(tag) => {
                if tag.name().as_ref().eq_ignore_ascii_case(b"head") {
                    debug!("reached </head>");
                    return Ok(());
                }
            }
            Event::Eof => {
                debug!("reached end of stream before </head>");
                return Ok(());
            }
            _ => {}
        }
        buf.clear();
    }
}

fn tag_name(tag: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase()
}

/// Classify a `<meta>` or `<link>` tag and apply it to the page
fn contribute(page: &mut Page, name: &str, tag: &BytesStart<'_>) -> Result<()> {
    match name {
        "meta" => {
            let attrs = attributes(tag);
            let meta = Meta::from_attrs(attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            meta.contribute(page).inspect_err(|err| {
                debug!(error = %err, "meta contribution failed");
            })
        }
        "link" => {
            let attrs = attributes(tag);
            Link::from_attrs(attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))).contribute(page);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Every attribute of `tag` in source order, keys lowercased and values decoded
fn attributes(tag: &BytesStart<'_>) -> Vec<(String, String)> {
    let mut attrs = tag.html_attributes();
    attrs.with_checks(false);
    attrs
        .filter_map(|attr| match attr {
            Ok(attr) => Some(attr),
            Err(err) => {
                trace!(error = %err, "skipping malformed attribute");
                None
            }
        })
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            (key, decode_text(&attr.value))
        })
        .collect()
}

/// Lossy UTF-8 with HTML character references resolved.
///
/// Text with a malformed reference is kept as written.
fn decode_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    match unescape_with(&text, resolve_html5_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            trace!(error = %err, "keeping undecoded text");
            text.into_owned()
        }
    }
}

fn capture_title(page: &mut Page, raw: &[u8]) {
    if !page.title.is_empty() || raw.is_empty() {
        return;
    }
    page.title = decode_text(raw);
    debug!(title = %page.title, "captured page title");
}

/// Consume the content of a raw-text element along with its end tag.
///
/// Returns the content. At end of stream everything read so far is returned.
fn read_raw_text<B: BufRead>(reader: &mut B, name: &str) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    let mut matcher = EndTagMatcher::new(name);
    let mut in_end_tag = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Stream(err)),
        };
        if available.is_empty() {
            return Ok(content);
        }

        let mut used = 0;
        let mut done = false;
        for &byte in available {
            used += 1;
            if in_end_tag {
                if byte == b'>' {
                    done = true;
                    break;
                }
                continue;
            }

            content.push(byte);
            if matcher.push(byte) {
                content.truncate(content.len() - matcher.len());
                if byte == b'>' {
                    done = true;
                    break;
                }
                in_end_tag = true;
            }
        }
        reader.consume(used);

        if done {
            return Ok(content);
        }
    }
}

/// Case-insensitive matcher for `</name` followed by a tag delimiter
struct EndTagMatcher {
    pattern: Vec<u8>,
    matched: usize,
}

impl EndTagMatcher {
    fn new(name: &str) -> Self {
        let mut pattern = b"</".to_vec();
        pattern.extend_from_slice(name.as_bytes());
        Self {
            pattern,
            matched: 0,
        }
    }

    /// Bytes consumed by a complete match, delimiter included
    fn len(&self) -> usize {
        self.pattern.len() + 1
    }

    /// Feed one byte, returning true once the end tag is recognized
    fn push(&mut self, byte: u8) -> bool {
        if self.matched == self.pattern.len() {
            if byte.is_ascii_whitespace() || byte == b'/' || byte == b'>' {
                self.matched = 0;
                return true;
            }
        } else if byte.to_ascii_lowercase() == self.pattern[self.matched] {
            self.matched += 1;
            return false;
        }

        self.matched = usize::from(byte == b'<');
        false
    }
}

/// quick-xml shares I/O errors behind an `Arc`
fn into_io_error(err: Arc<io::Error>) -> io::Error {
    Arc::try_unwrap(err).unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string()))
}
