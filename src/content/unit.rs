//! Content unit types.
//!
//! A news post is split into two shapes: [`NewsMeta`] (what listings see)
//! and [`NewsPost`] (metadata plus the raw body, for detail pages). Keeping
//! them as separate types means a listing can never carry a body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSlug {
    #[error("Slug is empty")]
    Empty,

    #[error("Slug starts with a dot: {0}")]
    Hidden(String),

    #[error("Slug contains a character that is not URL-path-safe: {0:?}")]
    UnsafeChar(String),

    #[error("Slug is reserved for the news listing: {0}")]
    Reserved(String),
}

/// Name of the listing page under `/news`; no post may take it
pub const RESERVED_SLUG: &str = "index";

/// URL-safe identifier derived from a content file name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate a candidate identifier.
    ///
    /// Only RFC 3986 unreserved characters are accepted, so a slug can be
    /// used as a single path segment without escaping and can never walk
    /// out of the content directory.
    pub fn parse(s: &str) -> Result<Self, InvalidSlug> {
        if s.is_empty() {
            return Err(InvalidSlug::Empty);
        }
        if s.starts_with('.') {
            return Err(InvalidSlug::Hidden(s.to_string()));
        }
        let safe = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
        if !safe {
            return Err(InvalidSlug::UnsafeChar(s.to_string()));
        }
        // Case-insensitive filesystems would map "Index" onto the same file
        if s.eq_ignore_ascii_case(RESERVED_SLUG) {
            return Err(InvalidSlug::Reserved(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = InvalidSlug;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = InvalidSlug;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Listing view of a news post (never carries the body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsMeta {
    /// Identifier taken from the file name
    pub slug: Slug,

    /// Headline
    pub title: String,

    /// Short description shown on cards and in SEO tags
    #[serde(rename = "excerpt")]
    pub summary: String,

    /// Publication date, used for ordering
    #[serde(rename = "date")]
    pub published_at: DateTime<Utc>,

    /// Byline
    pub author: String,

    /// Site-relative path of the hero image
    #[serde(rename = "image")]
    pub hero_image: String,

    /// Category badge label
    pub category: String,
}

impl NewsMeta {
    /// Detail page path for this post
    pub fn href(&self) -> String {
        format!("/news/{}", self.slug)
    }
}

/// Detail view of a news post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPost {
    #[serde(flatten)]
    pub meta: NewsMeta,

    /// Raw body text, handed to an external formatter for rendering
    #[serde(rename = "content")]
    pub body: String,
}

impl NewsPost {
    /// Drop the body, keeping only what a listing needs
    pub fn into_meta(self) -> NewsMeta {
        self.meta
    }

    /// Split into metadata and body
    pub fn into_parts(self) -> (NewsMeta, String) {
        (self.meta, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta(slug: &str) -> NewsMeta {
        NewsMeta {
            slug: Slug::parse(slug).unwrap(),
            title: "Pod unveiled".to_string(),
            summary: "First look".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap(),
            author: "Hyperloopin Team".to_string(),
            hero_image: "/images/news/pod.jpg".to_string(),
            category: "News".to_string(),
        }
    }

    #[test]
    fn test_slug_accepts_url_safe_names() {
        assert!(Slug::parse("pod-unveiling-2024").is_ok());
        assert!(Slug::parse("v1.2_release~final").is_ok());
        assert_eq!(Slug::parse("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_slug_rejects_unsafe_names() {
        assert_eq!(Slug::parse(""), Err(InvalidSlug::Empty));
        assert!(matches!(Slug::parse(".hidden"), Err(InvalidSlug::Hidden(_))));
        assert!(matches!(Slug::parse("../etc/passwd"), Err(InvalidSlug::Hidden(_))));
        assert!(matches!(Slug::parse("a/b"), Err(InvalidSlug::UnsafeChar(_))));
        assert!(matches!(Slug::parse("with space"), Err(InvalidSlug::UnsafeChar(_))));
        assert!(matches!("caf\u{e9}".parse::<Slug>(), Err(InvalidSlug::UnsafeChar(_))));
    }

    #[test]
    fn test_slug_rejects_listing_name() {
        assert!(matches!(Slug::parse("index"), Err(InvalidSlug::Reserved(_))));
        assert!(matches!(Slug::parse("Index"), Err(InvalidSlug::Reserved(_))));
        assert!(Slug::parse("index-2024").is_ok());
    }

    #[test]
    fn test_deserialize_validates_slug() {
        let slug: Slug = serde_json::from_str("\"pod\"").unwrap();
        assert_eq!(slug.as_str(), "pod");
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"pod\"");

        assert!(serde_json::from_str::<Slug>("\"../secret\"").is_err());
        assert!(serde_json::from_str::<Slug>("\"index\"").is_err());

        let mut value = serde_json::to_value(meta("pod")).unwrap();
        value["slug"] = serde_json::json!("a/b");
        assert!(serde_json::from_value::<NewsMeta>(value).is_err());
    }

    #[test]
    fn test_meta_serializes_with_site_field_names() {
        let value = serde_json::to_value(meta("pod")).unwrap();

        assert_eq!(value["slug"], "pod");
        assert_eq!(value["excerpt"], "First look");
        assert_eq!(value["date"], "2024-06-15T00:00:00Z");
        assert_eq!(value["image"], "/images/news/pod.jpg");
        assert!(value.get("content").is_none());
    }

    #[test]
    fn test_post_serializes_body_as_content() {
        let post = NewsPost {
            meta: meta("pod"),
            body: "# Hello\n".to_string(),
        };
        let value = serde_json::to_value(&post).unwrap();

        assert_eq!(value["slug"], "pod");
        assert_eq!(value["content"], "# Hello\n");
        assert_eq!(post.into_meta().href(), "/news/pod");
    }
}
