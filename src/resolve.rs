//! # URL Resolution
//!
//! Rewrites every URL collected from the head (image, video and audio URLs plus
//! favicons) into an absolute URL, using the page's own address as the base.
//! When no favicon was declared, `/favicon.ico` is assumed.

use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::page::Page;

/// Favicon location browsers fall back to when a page declares none
pub const DEFAULT_FAVICON: &str = "/favicon.ico";

/// Make every collected URL of `page` absolute.
///
/// Fails only if the page's own URL cannot be parsed.
pub fn resolve(page: &mut Page) -> Result<()> {
    let base = Url::parse(page.url())?;

    let og = &mut page.open_graph;
    for image in &mut og.images {
        absolutize(&base, &mut image.url);
        absolutize(&base, &mut image.secure_url);
    }
    for audio in &mut og.audio {
        absolutize(&base, &mut audio.url);
        absolutize(&base, &mut audio.secure_url);
    }
    for video in &mut og.videos {
        absolutize(&base, &mut video.url);
        absolutize(&base, &mut video.secure_url);
    }

    if page.favicons.is_empty() {
        debug!("no favicon declared, assuming {}", DEFAULT_FAVICON);
        page.favicons.push(DEFAULT_FAVICON.to_string());
    }
    for favicon in &mut page.favicons {
        absolutize(&base, favicon);
    }

    Ok(())
}

fn absolutize(base: &Url, value: &mut String) {
    if !value.is_empty() {
        *value = to_absolute(base, value);
    }
}

/// Resolve `value` against `base`
///
/// - absolute URLs are returned unchanged
/// - protocol-relative URLs (`//host/x`) take the base scheme
/// - root-relative URLs (`/x`) take the base scheme and host
/// - anything else is joined to the directory of the base path
pub fn to_absolute(base: &Url, value: &str) -> String {
    if Url::parse(value).is_ok() {
        return value.to_string();
    }
    if value.starts_with("//") {
        return format!("{}:{}", base.scheme(), value);
    }

    let origin = format!("{}://{}", base.scheme(), authority(base));
    if value.starts_with('/') {
        return format!("{}{}", origin, value);
    }
    format!("{}{}", origin, join_path(base.path(), value))
}

/// Host and, when it is not the scheme default, port of `base`
fn authority(base: &Url) -> String {
    match (base.host_str(), base.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Join a relative reference onto the directory of `base_path`, collapsing `.` and `..`
fn join_path(base_path: &str, relative: &str) -> String {
    let split = relative.find(['?', '#']).unwrap_or(relative.len());
    let (path, suffix) = relative.split_at(split);

    let directory = match base_path.rfind('/') {
        Some(index) => &base_path[..=index],
        None => "/",
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in directory.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut joined = format!("/{}", segments.join("/"));
    let trailing = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    if trailing && !joined.ends_with('/') {
        joined.push('/');
    }
    joined.push_str(suffix);
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Image;

    fn base() -> Url {
        Url::parse("https://example.com/news/article.html").unwrap()
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            to_absolute(&base(), "/favicon.ico"),
            "https://example.com/favicon.ico"
        );
    }

    #[test]
    fn test_path_relative() {
        assert_eq!(
            to_absolute(&base(), "icons/x.png"),
            "https://example.com/news/icons/x.png"
        );
        assert_eq!(
            to_absolute(&base(), "./icons/../x.png"),
            "https://example.com/news/x.png"
        );
        assert_eq!(
            to_absolute(&base(), "../../../x.png?v=1#top"),
            "https://example.com/x.png?v=1#top"
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            to_absolute(&base(), "//cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }

    #[test]
    fn test_absolute_is_unchanged() {
        assert_eq!(
            to_absolute(&base(), "http://other.org/x.png"),
            "http://other.org/x.png"
        );
        assert_eq!(
            to_absolute(&base(), "http://other.org"),
            "http://other.org"
        );
    }

    #[test]
    fn test_port_is_kept() {
        let base = Url::parse("http://localhost:8080/a/b").unwrap();
        assert_eq!(to_absolute(&base, "/x"), "http://localhost:8080/x");
        assert_eq!(to_absolute(&base, "c/"), "http://localhost:8080/a/c/");
    }

    #[test]
    fn test_base_directory() {
        assert_eq!(join_path("/news/", "x.png"), "/news/x.png");
        assert_eq!(join_path("/", "x.png"), "/x.png");
        assert_eq!(join_path("", "x.png"), "/x.png");
        assert_eq!(join_path("/a/b", ".."), "/");
    }

    #[test]
    fn test_resolve_seeds_default_favicon() {
        let mut page = Page::new("https://example.com/news/article.html");
        resolve(&mut page).unwrap();
        assert_eq!(page.favicons, ["https://example.com/favicon.ico"]);
    }

    #[test]
    fn test_resolve_rewrites_all_media() {
        let mut page = Page::new("https://example.com/news/article.html");
        page.favicons.push("icons/x.png".to_string());
        page.open_graph.images.push(Image {
            url: "a.jpg".to_string(),
            secure_url: "//cdn.example.com/a.jpg".to_string(),
            ..Default::default()
        });
        page.open_graph.images.push(Image::default());

        resolve(&mut page).unwrap();
        assert_eq!(page.favicons, ["https://example.com/news/icons/x.png"]);
        assert_eq!(page.open_graph.images[0].url, "https://example.com/news/a.jpg");
        assert_eq!(
            page.open_graph.images[0].secure_url,
            "https://cdn.example.com/a.jpg"
        );
        assert!(page.open_graph.images[1].url.is_empty());
    }

    #[test]
    fn test_resolve_rejects_bad_base() {
        let mut page = Page::new("not a url");
        let err = resolve(&mut page).unwrap_err();
        assert!(matches!(err, crate::error::Error::UrlParse(_)));
    }
}
