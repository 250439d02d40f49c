//! # Metadata Aggregation
//!
//! Folds `<meta>` and `<link>` descriptors into a [`Page`].
//!
//! Meta tags are dispatched through [`RULES`], an ordered table where the first
//! matching row wins. Order matters: a root property such as `og:image` (or its
//! `og:image:url` alias) must be recognized before the `og:image:` prefix row that
//! handles sub-properties.
//!
//! Repeatable OpenGraph structures (images, videos, audio) follow the "current
//! element" rule:
//!
//! - a root property appends a new element, unless its value equals the URL of the
//!   last element in the list;
//! - a sub-property amends the last element, and is dropped if the list is empty.

use std::num::ParseIntError;

use tracing::debug;

use crate::error::{Error, Result};
use crate::head::dates::parse_date;
use crate::head::tags::{Link, Meta};
use crate::page::{Audio, Image, Page, Video};

/// How a rule recognizes a meta tag
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// `name` equals the key and `content` is non-empty
    Name(&'static str),
    /// `property` equals the key and `content` is non-empty
    Filled(&'static str),
    /// `property` equals the key
    Property(&'static str),
    /// `property` is the key or `<key>:url`
    Root(&'static str),
    /// `property` starts with `<key>:`
    Sub(&'static str),
}

impl Pattern {
    fn matches(self, meta: &Meta) -> bool {
        match self {
            Pattern::Name(key) => meta.name == key && !meta.content.is_empty(),
            Pattern::Filled(key) => meta.property == key && !meta.content.is_empty(),
            Pattern::Property(key) => meta.property == key,
            Pattern::Root(key) => {
                meta.property == key
                    || meta
                        .property
                        .strip_prefix(key)
                        .is_some_and(|rest| rest == ":url")
            }
            Pattern::Sub(key) => meta
                .property
                .strip_prefix(key)
                .is_some_and(|rest| rest.starts_with(':')),
        }
    }
}

/// The page field a rule writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Description,
    Keywords,
    Author,
    OgTitle,
    OgDescription,
    OgSiteName,
    ImageRoot,
    ImageProperty,
    AudioRoot,
    AudioProperty,
    VideoRoot,
    VideoProperty,
    OgType,
    OgUrl,
    OgLocale,
    OgUpdatedTime,
    ArticleAuthor,
    ArticlePublishedTime,
    ArticleModifiedTime,
    ArticleExpirationTime,
    ArticlePublisher,
    ArticleSection,
    ArticleTag,
}

/// Dispatch table for meta tags, checked top to bottom
const RULES: &[(Pattern, Target)] = &[
    (Pattern::Name("description"), Target::Description),
    (Pattern::Name("keywords"), Target::Keywords),
    (Pattern::Name("author"), Target::Author),
    (Pattern::Filled("og:title"), Target::OgTitle),
    (Pattern::Filled("og:description"), Target::OgDescription),
    (Pattern::Property("og:site_name"), Target::OgSiteName),
    (Pattern::Root("og:image"), Target::ImageRoot),
    (Pattern::Sub("og:image"), Target::ImageProperty),
    (Pattern::Root("og:audio"), Target::AudioRoot),
    (Pattern::Sub("og:audio"), Target::AudioProperty),
    (Pattern::Root("og:video"), Target::VideoRoot),
    (Pattern::Sub("og:video"), Target::VideoProperty),
    (Pattern::Property("og:type"), Target::OgType),
    (Pattern::Property("og:url"), Target::OgUrl),
    (Pattern::Property("og:locale"), Target::OgLocale),
    (Pattern::Property("og:updated_time"), Target::OgUpdatedTime),
    (Pattern::Property("article:author"), Target::ArticleAuthor),
    (Pattern::Property("article:published_time"), Target::ArticlePublishedTime),
    (Pattern::Property("article:modified_time"), Target::ArticleModifiedTime),
    (Pattern::Property("article:expiration_time"), Target::ArticleExpirationTime),
    (Pattern::Property("article:publisher"), Target::ArticlePublisher),
    (Pattern::Property("article:section"), Target::ArticleSection),
    (Pattern::Property("article:tag"), Target::ArticleTag),
];

fn classify(meta: &Meta) -> Option<Target> {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(meta))
        .map(|&(_, target)| target)
}

/// Anything stored in a repeatable OpenGraph list
trait Structured: Default {
    fn url(&self) -> &str;
    fn with_url(url: &str) -> Self;
}

impl Structured for Image {
    fn url(&self) -> &str {
        &self.url
    }

    fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }
}

impl Structured for Video {
    fn url(&self) -> &str {
        &self.url
    }

    fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }
}

impl Structured for Audio {
    fn url(&self) -> &str {
        &self.url
    }

    fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }
}

/// Open a new element unless the last one already has this URL
fn open_root<T: Structured>(list: &mut Vec<T>, url: &str) {
    if list.last().is_none_or(|last| last.url() != url) {
        list.push(T::with_url(url));
    }
}

/// Index of the element sub-properties currently apply to
fn current<T>(list: &[T]) -> Option<usize> {
    list.len().checked_sub(1)
}

/// Append unless the value repeats the last entry
fn push_distinct(list: &mut Vec<String>, value: &str) {
    if list.last().is_none_or(|last| last != value) {
        list.push(value.to_string());
    }
}

impl Meta {
    /// Apply this tag to `page`.
    ///
    /// Fails only when a numeric sub-property (`width`, `height`, `duration`) is
    /// not an integer. Unparseable dates clear the field instead.
    pub fn contribute(&self, page: &mut Page) -> Result<()> {
        let Some(target) = classify(self) else {
            return Ok(());
        };

        let content = self.content.as_str();
        let og = &mut page.open_graph;
        match target {
            Target::Description => page.description = content.to_string(),
            Target::Keywords => page.keywords = content.to_string(),
            Target::Author => push_distinct(&mut page.authors, content),
            Target::OgTitle => og.title = content.to_string(),
            Target::OgDescription => og.description = content.to_string(),
            Target::OgSiteName => og.site_name = content.to_string(),
            Target::ImageRoot => open_root(&mut og.images, content),
            Target::ImageProperty => self.amend_image(&mut og.images)?,
            Target::AudioRoot => open_root(&mut og.audio, content),
            Target::AudioProperty => self.amend_audio(&mut og.audio),
            Target::VideoRoot => open_root(&mut og.videos, content),
            Target::VideoProperty => self.amend_video(&mut og.videos)?,
            Target::OgType => og.kind = content.to_string(),
            Target::OgUrl => og.url = content.to_string(),
            Target::OgLocale => og.locale = content.to_string(),
            Target::OgUpdatedTime => og.updated_time = self.date(),
            Target::ArticleAuthor => og.article.authors.push(content.to_string()),
            Target::ArticlePublishedTime => og.article.published_time = self.date(),
            Target::ArticleModifiedTime => og.article.modified_time = self.date(),
            Target::ArticleExpirationTime => og.article.expiration_time = self.date(),
            Target::ArticlePublisher => og.article.publisher = content.to_string(),
            Target::ArticleSection => og.article.sections.push(content.to_string()),
            Target::ArticleTag => og.article.tags.push(content.to_string()),
        }
        Ok(())
    }

    fn amend_image(&self, images: &mut [Image]) -> Result<()> {
        let Some(index) = current(images) else {
            debug!(property = %self.property, "no open og:image, dropping property");
            return Ok(());
        };

        let image = &mut images[index];
        match self.property.as_str() {
            "og:image:type" => image.content_type = self.content.clone(),
            "og:image:secure_url" => image.secure_url = self.content.clone(),
            "og:image:alt" => image.alt = self.content.clone(),
            "og:image:width" => image.width = self.integer()?,
            "og:image:height" => image.height = self.integer()?,
            _ => {}
        }
        Ok(())
    }

    fn amend_audio(&self, audio: &mut [Audio]) {
        let Some(index) = current(audio) else {
            debug!(property = %self.property, "no open og:audio, dropping property");
            return;
        };

        let track = &mut audio[index];
        match self.property.as_str() {
            "og:audio:type" => track.content_type = self.content.clone(),
            "og:audio:secure_url" => track.secure_url = self.content.clone(),
            _ => {}
        }
    }

    fn amend_video(&self, videos: &mut [Video]) -> Result<()> {
        let Some(index) = current(videos) else {
            debug!(property = %self.property, "no open og:video, dropping property");
            return Ok(());
        };

        let video = &mut videos[index];
        match self.property.as_str() {
            "og:video:type" => video.content_type = self.content.clone(),
            "og:video:secure_url" => video.secure_url = self.content.clone(),
            "og:video:width" => video.width = self.integer()?,
            "og:video:height" => video.height = self.integer()?,
            "og:video:duration" => video.duration = self.integer()?,
            "og:video:tag" => video.tags.push(self.content.clone()),
            _ => {}
        }
        Ok(())
    }

    fn integer(&self) -> Result<i64> {
        self.content
            .parse()
            .map_err(|source: ParseIntError| Error::Contribution {
                property: self.property.clone(),
                value: self.content.clone(),
                source,
            })
    }

    fn date(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let date = parse_date(&self.content);
        if date.is_none() {
            debug!(property = %self.property, content = %self.content, "unparseable date");
        }
        date
    }
}

impl Link {
    /// Record this link as a favicon candidate if it is one
    pub fn contribute(&self, page: &mut Page) {
        if self.is_icon() {
            push_distinct(&mut page.favicons, &self.href);
        }
    }
}
