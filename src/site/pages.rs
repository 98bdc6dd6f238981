//! Page props handed to the rendering surface.
//!
//! These are plain data: the rendering layer decides how they look. The
//! detail page carries the raw body under `content`; turning it into
//! headings, lists and code blocks is the formatter's job.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SiteInfo;
use crate::content::{NewsMeta, NewsPost};

/// Open Graph image size used for article cards
const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;

/// Where "back" links on the not-found page point
pub const NEWS_INDEX_HREF: &str = "/news";

/// SEO tags for a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seo {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub noindex: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_graph: Option<OpenGraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<OgArticle>,
    pub images: Vec<OgImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgArticle {
    pub published_time: DateTime<Utc>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// schema.org `BlogPosting` structured data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleJsonLd {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub url: String,
    pub headline: String,
    pub image: Vec<String>,
    #[serde(rename = "datePublished")]
    pub date_published: DateTime<Utc>,
    pub author: JsonLdPerson,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonLdPerson {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
}

/// Navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// Landing page: site info and the latest posts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub seo: Seo,
    pub site: SiteInfo,
    pub recent_posts: Vec<NewsMeta>,
}

impl HomePage {
    /// `posts` must already be sorted newest first
    pub fn new(site: &SiteInfo, posts: &[NewsMeta], limit: usize) -> Self {
        Self {
            seo: Seo {
                title: format!("{} - {}", site.name, site.tagline),
                description: site.description.clone(),
                canonical: Some(site.absolute("/")),
                noindex: false,
                open_graph: None,
            },
            site: site.clone(),
            recent_posts: posts.iter().take(limit).cloned().collect(),
        }
    }
}

/// All posts, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsIndexPage {
    pub seo: Seo,
    pub posts: Vec<NewsMeta>,
}

impl NewsIndexPage {
    pub fn new(site: &SiteInfo, posts: Vec<NewsMeta>) -> Self {
        Self {
            seo: Seo {
                title: site.page_title("News & Updates"),
                description: "Stay updated with our latest achievements, announcements, and \
                              behind-the-scenes stories from our journey."
                    .to_string(),
                canonical: Some(site.absolute(NEWS_INDEX_HREF)),
                noindex: false,
                open_graph: None,
            },
            posts,
        }
    }
}

/// Detail page for one post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsPostPage {
    pub seo: Seo,
    pub json_ld: ArticleJsonLd,
    pub meta: NewsMeta,
    /// Raw body
    pub content: String,
}

impl NewsPostPage {
    pub fn new(site: &SiteInfo, post: NewsPost) -> Self {
        let (meta, content) = post.into_parts();
        let url = site.absolute(&meta.href());
        let image = site.absolute(&meta.hero_image);

        let seo = Seo {
            title: site.page_title(&meta.title),
            description: meta.summary.clone(),
            canonical: Some(url.clone()),
            noindex: false,
            open_graph: Some(OpenGraph {
                kind: "article".to_string(),
                title: meta.title.clone(),
                description: meta.summary.clone(),
                url: url.clone(),
                site_name: site.name.clone(),
                article: Some(OgArticle {
                    published_time: meta.published_at,
                    authors: vec![meta.author.clone()],
                    tags: vec![meta.category.clone()],
                }),
                images: vec![OgImage {
                    url: image.clone(),
                    width: OG_IMAGE_WIDTH,
                    height: OG_IMAGE_HEIGHT,
                    alt: meta.title.clone(),
                }],
            }),
        };

        let json_ld = ArticleJsonLd {
            context: "https://schema.org".to_string(),
            kind: "BlogPosting".to_string(),
            url,
            headline: meta.title.clone(),
            image: vec![image],
            date_published: meta.published_at,
            author: JsonLdPerson {
                kind: "Person".to_string(),
                name: meta.author.clone(),
            },
            description: meta.summary.clone(),
        };

        Self {
            seo,
            json_ld,
            meta,
            content,
        }
    }
}

/// Shown for any path that does not resolve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFoundPage {
    pub seo: Seo,
    pub heading: String,
    pub links: Vec<Link>,
}

impl NotFoundPage {
    pub fn new(site: &SiteInfo) -> Self {
        Self {
            seo: Seo {
                title: site.page_title("Page Not Found"),
                description: "The page you're looking for doesn't exist.".to_string(),
                canonical: None,
                noindex: true,
                open_graph: None,
            },
            heading: "Oops! Page Not Found".to_string(),
            links: vec![
                Link {
                    label: "Back to News".to_string(),
                    href: NEWS_INDEX_HREF.to_string(),
                },
                Link {
                    label: "Go Home".to_string(),
                    href: "/".to_string(),
                },
            ],
        }
    }
}

/// Props for any route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Home(HomePage),
    NewsIndex(NewsIndexPage),
    NewsPost(Box<NewsPostPage>),
    NotFound(NotFoundPage),
}

impl Page {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Page::NotFound(_))
    }
}
