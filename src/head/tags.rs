//! Typed descriptors for `<meta>` and `<link>` tags

/// The attributes of a `<meta>` tag that matter for metadata extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub name: String,
    pub property: String,
    pub content: String,
}

impl Meta {
    /// Build a descriptor from a tag's attributes. Later duplicates win.
    pub fn from_attrs<'a, I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut meta = Self::default();
        for (key, value) in attrs {
            match key {
                "name" => meta.name = value.to_string(),
                "property" => meta.property = value.to_string(),
                "content" => meta.content = value.to_string(),
                _ => {}
            }
        }
        meta
    }
}

/// The attributes of a `<link>` tag that matter for favicon discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub rel: String,
    /// Non-standard `ref` attribute, seen on pages that misspell `rel`
    pub reference: String,
    pub href: String,
}

impl Link {
    /// Build a descriptor from a tag's attributes. Later duplicates win.
    pub fn from_attrs<'a, I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut link = Self::default();
        for (key, value) in attrs {
            match key {
                "rel" => link.rel = value.to_string(),
                "ref" => link.reference = value.to_string(),
                "href" => link.href = value.to_string(),
                _ => {}
            }
        }
        link
    }

    /// Whether this link points at a favicon
    pub fn is_icon(&self) -> bool {
        let kind = format!("{}{}", self.rel, self.reference);
        (kind.contains("shortcut") || kind.contains("icon")) && !self.href.is_empty()
    }
}
