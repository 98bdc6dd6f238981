//! Static site data generation.
//!
//! Turns the content store into page props:
//!
//! ```text
//! /               -> HomePage      (latest N posts)
//! /news           -> NewsIndexPage (all posts, newest first)
//! /news/<slug>    -> NewsPostPage  (one post with its raw body)
//! anything else   -> NotFoundPage
//! ```
//!
//! An unknown slug is an ordinary [`Page::NotFound`], never an error.

pub mod build;
pub mod pages;
pub mod routes;
pub mod watch;

pub use build::{BuildError, BuildSummary, Manifest, ManifestEntry, SiteBuilder};
pub use pages::{HomePage, NewsIndexPage, NewsPostPage, NotFoundPage, Page};
pub use routes::Route;
pub use watch::{ContentWatcher, RebuildEvent, WatchConfig, WatchError, WatchHandle};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::{ResolvedConfig, SiteInfo};
use crate::content::{ContentStore, FixedClock, NewsMeta, StoreError};

/// Content store plus the site metadata needed to render pages
#[derive(Debug, Clone)]
pub struct Site {
    store: ContentStore,
    info: SiteInfo,
    recent_posts: usize,
}

impl Site {
    pub fn new(store: ContentStore, info: SiteInfo, recent_posts: usize) -> Self {
        Self {
            store,
            info,
            recent_posts,
        }
    }

    /// Site over the configured content directory
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.store(), config.site.clone(), config.recent_posts)
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn info(&self) -> &SiteInfo {
        &self.info
    }

    /// Same site with the store's clock frozen at `now`
    pub fn pinned_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            store: self.store.clone().with_clock(Arc::new(FixedClock(now))),
            info: self.info.clone(),
            recent_posts: self.recent_posts,
        }
    }

    /// One detail path per identifier, in slug order
    pub async fn static_paths(&self) -> Result<Vec<String>, StoreError> {
        let slugs = self.store.list_slugs().await?;
        Ok(slugs
            .iter()
            .map(|slug| routes::post_path(slug.as_str()))
            .collect())
    }

    pub fn home_page(&self, posts: &[NewsMeta]) -> HomePage {
        HomePage::new(&self.info, posts, self.recent_posts)
    }

    pub fn news_index_page(&self, posts: Vec<NewsMeta>) -> NewsIndexPage {
        NewsIndexPage::new(&self.info, posts)
    }

    pub fn not_found_page(&self) -> NotFoundPage {
        NotFoundPage::new(&self.info)
    }

    /// Detail page for a slug, or `None` when it does not resolve
    pub async fn post_page(&self, slug: &str) -> Result<Option<NewsPostPage>, StoreError> {
        let post = self.store.get(slug).await?;
        Ok(post.map(|post| NewsPostPage::new(&self.info, post)))
    }

    /// Page props for a request path
    pub async fn render(&self, path: &str) -> Result<Page, StoreError> {
        let page = match Route::parse(path) {
            Route::Home => {
                let posts = self.store.list_summaries().await?;
                Page::Home(self.home_page(&posts))
            }
            Route::NewsIndex => {
                let posts = self.store.list_summaries().await?;
                Page::NewsIndex(self.news_index_page(posts))
            }
            Route::NewsPost(slug) => match self.post_page(&slug).await? {
                Some(page) => Page::NewsPost(Box::new(page)),
                None => Page::NotFound(self.not_found_page()),
            },
            Route::Unknown => Page::NotFound(self.not_found_page()),
        };
        Ok(page)
    }
}
