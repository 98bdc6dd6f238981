//! URL routing for the generated site.

use crate::content::RESERVED_SLUG;

/// A request path, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,

    /// `/news`
    NewsIndex,

    /// `/news/<slug>`; the slug is not checked against the content yet
    NewsPost(String),

    /// Anything else
    Unknown,
}

impl Route {
    /// Classify a site-relative path. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();

        match segments.as_slice() {
            [""] => Route::Home,
            ["news"] => Route::NewsIndex,
            ["news", name] if *name == RESERVED_SLUG => Route::NewsIndex,
            ["news", slug] if !slug.is_empty() => Route::NewsPost(slug.to_string()),
            _ => Route::Unknown,
        }
    }
}

/// Detail page path for a slug
pub fn post_path(slug: &str) -> String {
    format!("/news/{}", slug)
}
