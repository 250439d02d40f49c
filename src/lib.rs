//! # pagemeta - Web Page Head Metadata for Rust
//!
//! This crate fetches a single web page and extracts structured metadata from its
//! document head: title, description, keywords, authors, favicons, and the
//! OpenGraph / Article vocabulary (images, videos, audio, article authorship and
//! timing).
//!
//! ## Features
//!
//! - One request per page; the body is streamed and parsing stops at `</head>`
//! - Repeatable `og:image` / `og:video` / `og:audio` structures with their
//!   sub-properties grouped onto the element they follow
//! - Relative image, media and favicon URLs resolved against the page address
//! - Explicit transport configuration, no global client state
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagemeta::fetch::{Client, FetchConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(FetchConfig::default())?;
//!     let page = client.fetch("https://example.com/")?;
//!
//!     println!("{}", page.title);
//!     for image in &page.open_graph.images {
//!         println!("{} ({}x{})", image.url, image.width, image.height);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Documents that are already in memory or on disk go through [`extract`]:
//!
//! ```rust
//! let html = r#"<head><title>Hello</title><link rel="icon" href="/i.png"></head>"#;
//! let page = pagemeta::extract(html.as_bytes(), "https://example.com/a/b.html").unwrap();
//! assert_eq!(page.title, "Hello");
//! assert_eq!(page.favicons, ["https://example.com/i.png"]);
//! ```

mod error;
pub mod fetch;
pub mod head;
pub mod page;
pub mod resolve;

use std::io::Read;

use tracing::{debug, instrument};

pub use error::{Error, Result};
pub use page::{Article, Audio, Image, OpenGraph, Page, Video};

/// Extract head metadata from the HTML document in `reader`.
///
/// `source_url` is the address the document was served from. It is recorded on
/// the page and used as the base for relative URLs.
#[instrument(skip(reader), level = "debug")]
pub fn extract<R: Read>(reader: R, source_url: &str) -> Result<Page> {
    let mut page = Page::new(source_url);
    head::parse(&mut page, reader)?;
    resolve::resolve(&mut page)?;

    debug!(
        title = %page.title,
        images = page.open_graph.images.len(),
        videos = page.open_graph.videos.len(),
        audio = page.open_graph.audio.len(),
        favicons = page.favicons.len(),
        "extracted page metadata"
    );
    Ok(page)
}

/// Fetch `url` with the default configuration and extract its head metadata
pub fn fetch_page(url: &str) -> Result<Page> {
    fetch::Client::new(fetch::FetchConfig::default())?.fetch(url)
}

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::fetch::{Client, FetchConfig};
    pub use crate::page::Page;
}
