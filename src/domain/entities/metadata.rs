//! Page and site metadata carrying the image slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Dimensions;

/// An image reference inside metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image URL, if any.
    #[serde(default)]
    pub url: Option<String>,
    /// Known dimensions. Omitted from output when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Any other fields carried by the reference.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageRef {
    /// Creates a reference with the given URL and no dimensions.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Creates a reference without a URL.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets known dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(Dimensions::new(width, height));
        self
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns true if dimensions are already known.
    #[must_use]
    pub const fn has_dimensions(&self) -> bool {
        self.dimensions.is_some()
    }
}

/// Site-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogMeta {
    /// Site logo.
    pub logo: ImageRef,
    /// Remaining site fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Cover (feature) image.
    pub cover_image: ImageRef,
    /// Author profile image.
    pub author_image: ImageRef,
    /// Site metadata holding the logo.
    pub blog: BlogMeta,
    /// Remaining page fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Creates metadata from the three image references.
    #[must_use]
    pub fn new(cover_image: ImageRef, author_image: ImageRef, logo: ImageRef) -> Self {
        Self {
            cover_image,
            author_image,
            blog: BlogMeta {
                logo,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    /// Returns the reference held in a slot.
    #[must_use]
    pub const fn slot(&self, slot: Slot) -> &ImageRef {
        match slot {
            Slot::CoverImage => &self.cover_image,
            Slot::AuthorImage => &self.author_image,
            Slot::Logo => &self.blog.logo,
        }
    }

    /// Returns the reference held in a slot, mutably.
    pub const fn slot_mut(&mut self, slot: Slot) -> &mut ImageRef {
        match slot {
            Slot::CoverImage => &mut self.cover_image,
            Slot::AuthorImage => &mut self.author_image,
            Slot::Logo => &mut self.blog.logo,
        }
    }
}

/// The image slots subject to dimension resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `coverImage`.
    CoverImage,
    /// `authorImage`.
    AuthorImage,
    /// `blog.logo`.
    Logo,
}

impl Slot {
    /// All slots, in document order.
    pub const ALL: [Self; 3] = [Self::CoverImage, Self::AuthorImage, Self::Logo];

    /// JSON path of the slot.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::CoverImage => "coverImage",
            Self::AuthorImage => "authorImage",
            Self::Logo => "blog.logo",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let value = json!({
            "title": "Hello",
            "coverImage": { "url": "http://mysite.com/cover.jpg", "alt": "cover" },
            "authorImage": { "url": null },
            "blog": { "title": "My Site", "logo": { "url": "http://mysite.com/logo.png" } }
        });

        let metadata: Metadata = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(metadata.cover_image.url(), Some("http://mysite.com/cover.jpg"));
        assert_eq!(metadata.author_image.url(), None);
        assert_eq!(metadata.extra.get("title"), Some(&json!("Hello")));
        assert_eq!(serde_json::to_value(&metadata).unwrap(), value);
    }

    #[test]
    fn test_missing_url_serializes_as_null() {
        let metadata: Metadata = serde_json::from_value(json!({
            "coverImage": {},
            "authorImage": {},
            "blog": { "logo": {} }
        }))
        .unwrap();

        let out = serde_json::to_value(&metadata).unwrap();
        assert_eq!(out["coverImage"], json!({ "url": null }));
        assert!(out["blog"]["logo"].get("dimensions").is_none());
    }

    #[test]
    fn test_slot_accessors() {
        let mut metadata = Metadata::new(
            ImageRef::new("cover"),
            ImageRef::new("author"),
            ImageRef::new("logo"),
        );
        assert_eq!(metadata.slot(Slot::Logo).url(), Some("logo"));

        metadata.slot_mut(Slot::AuthorImage).dimensions = Some(Dimensions::new(1, 2));
        assert!(metadata.author_image.has_dimensions());
        assert_eq!(Slot::Logo.to_string(), "blog.logo");
    }
}
