//! # Page Metadata Model
//!
//! Types describing everything pagemeta collects from a document head. A [`Page`]
//! is created empty with only its URL, filled in while the head is scanned and
//! then normalized by the URL resolver.
//!
//! ## Key Components
//!
//! - `Page`: Root aggregate with title, description, keywords, authors and favicons
//! - `OpenGraph`: The `og:*` vocabulary, including repeatable images, videos and audio
//! - `Article`: The `article:*` vocabulary (timestamps, authors, sections, tags)
//!
//! All types serialize to JSON with empty values omitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Metadata extracted from a single page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// URL the page was fetched from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    url: String,

    /// Text of the first `<title>` element
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// `<meta name="description">`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// `<meta name="keywords">`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keywords: String,

    /// Every `<meta name="author">`, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Favicon candidates from `<link rel="icon">` and friends
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub favicons: Vec<String>,

    /// OpenGraph properties
    #[serde(default, skip_serializing_if = "OpenGraph::is_empty")]
    pub open_graph: OpenGraph,
}

impl Page {
    /// Create an empty page for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// The URL the page was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// OpenGraph (`og:*`) metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenGraph {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// `og:type`
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locale: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub site_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Video>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio: Vec<Audio>,

    #[serde(default, skip_serializing_if = "Article::is_empty")]
    pub article: Article,
}

impl OpenGraph {
    /// Whether no OpenGraph property was found
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Article (`article:*`) metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Article {
    /// Whether no article property was found
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An `og:image` with its sub-properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secure_url: String,

    /// MIME type
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
}

/// An `og:video` with its sub-properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secure_url: String,

    /// MIME type
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i64,

    /// Duration in seconds
    #[serde(default, skip_serializing_if = "is_zero")]
    pub duration: i64,

    #[serde(rename = "tag", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// An `og:audio` with its sub-properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secure_url: String,

    /// MIME type
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_only_has_url() {
        let page = Page::new("https://example.com/");
        assert_eq!(page.url(), "https://example.com/");
        assert!(page.title.is_empty());
        assert!(page.open_graph.is_empty());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, serde_json::json!({ "url": "https://example.com/" }));
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let mut page = Page::new("https://example.com/");
        page.open_graph.kind = "article".to_string();
        page.open_graph.images.push(Image {
            url: "https://example.com/a.jpg".to_string(),
            width: 100,
            ..Default::default()
        });
        page.open_graph.videos.push(Video {
            url: "https://example.com/v.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            tags: vec!["cats".to_string()],
            ..Default::default()
        });

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com/",
                "open_graph": {
                    "type": "article",
                    "images": [{ "url": "https://example.com/a.jpg", "width": 100 }],
                    "videos": [{
                        "url": "https://example.com/v.mp4",
                        "type": "video/mp4",
                        "tag": ["cats"]
                    }]
                }
            })
        );
    }

    #[test]
    fn test_article_timestamps_serialize_as_rfc3339() {
        let mut page = Page::new("https://example.com/");
        page.open_graph.article.published_time =
            Some("2023-04-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json["open_graph"]["article"]["published_time"],
            "2023-04-01T12:00:00Z"
        );
    }
}
