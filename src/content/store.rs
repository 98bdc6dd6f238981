//! Directory-backed content store.
//!
//! Every call re-reads the content directory; nothing is cached. Missing
//! or malformed content degrades to "absent", while filesystem failures
//! unrelated to content shape surface as [`StoreError::StorageUnavailable`]
//! so a build can fail loudly instead of publishing an empty site.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::defaults::{MissingDate, UnitDefaults};
use super::front_matter::{self, non_empty, ParseError};
use super::unit::{NewsMeta, NewsPost, Slug};

/// Preferred content file extension
pub const PRIMARY_EXTENSION: &str = "mdx";

/// Fallback content file extension
pub const SECONDARY_EXTENSION: &str = "md";

/// Extensions in priority order
pub const EXTENSIONS: [&str; 2] = [PRIMARY_EXTENSION, SECONDARY_EXTENSION];

/// Hard failures of the underlying storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Content storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn unavailable(path: &Path, source: std::io::Error) -> Self {
        StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Outcome of looking up a single unit
#[derive(Debug)]
pub enum Lookup {
    Found(Box<NewsPost>),
    NotFound,
    Malformed { path: PathBuf, error: ParseError },
}

/// Full picture of the content directory, for build validation
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Valid units, newest first
    pub posts: Vec<NewsMeta>,

    /// Files that exist but could not be parsed
    pub malformed: Vec<(PathBuf, String)>,

    /// Secondary-extension files hidden by a primary file with the same slug
    pub shadowed: Vec<PathBuf>,

    /// Content files whose name is not a usable slug
    pub skipped: Vec<PathBuf>,
}

impl ScanReport {
    /// True when every content file made it into the listing
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.shadowed.is_empty() && self.skipped.is_empty()
    }
}

/// Winning file per slug plus everything that lost or was unusable
#[derive(Debug, Default)]
struct Listing {
    files: BTreeMap<Slug, (usize, PathBuf)>,
    shadowed: Vec<PathBuf>,
    skipped: Vec<PathBuf>,
}

/// Read-only store over a directory of content files
#[derive(Clone)]
pub struct ContentStore {
    root: PathBuf,
    defaults: UnitDefaults,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("root", &self.root)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ContentStore {
    /// Create a store over `root` with built-in placeholders and the wall clock
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            defaults: UnitDefaults::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the placeholder metadata
    pub fn with_defaults(mut self, defaults: UnitDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the clock used for undated units
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Content directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Placeholder metadata in effect
    pub fn defaults(&self) -> &UnitDefaults {
        &self.defaults
    }

    /// Current time according to the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All identifiers in the content directory, ascending and de-duplicated
    pub async fn list_slugs(&self) -> Result<Vec<Slug>, StoreError> {
        let listing = self.read_listing().await?;
        Ok(listing.files.into_keys().collect())
    }

    /// Look up one unit, folding malformed content into "absent"
    pub async fn get(&self, slug: &str) -> Result<Option<NewsPost>, StoreError> {
        match self.load(slug).await? {
            Lookup::Found(post) => Ok(Some(*post)),
            Lookup::NotFound => Ok(None),
            Lookup::Malformed { path, error } => {
                warn!(path = %path.display(), %error, "Skipping malformed content unit");
                Ok(None)
            }
        }
    }

    /// Look up one unit, keeping the reason it could not be used
    pub async fn load(&self, slug: &str) -> Result<Lookup, StoreError> {
        let slug = match Slug::parse(slug) {
            Ok(slug) => slug,
            Err(e) => {
                debug!(%e, "Rejected content identifier");
                return Ok(Lookup::NotFound);
            }
        };

        let Some(path) = self.resolve(&slug).await? else {
            return Ok(Lookup::NotFound);
        };

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Lookup::NotFound),
            Err(e) => return Err(StoreError::unavailable(&path, e)),
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                return Ok(Lookup::Malformed {
                    path,
                    error: ParseError::NotUtf8,
                })
            }
        };

        match self.build_post(slug, &text) {
            Ok(post) => Ok(Lookup::Found(Box::new(post))),
            Err(error) => Ok(Lookup::Malformed { path, error }),
        }
    }

    /// Listing of every valid unit, newest first, without bodies
    pub async fn list_summaries(&self) -> Result<Vec<NewsMeta>, StoreError> {
        Ok(self.scan().await?.posts)
    }

    /// Listing plus everything that was left out of it
    pub async fn scan(&self) -> Result<ScanReport, StoreError> {
        let listing = self.read_listing().await?;
        let mut report = ScanReport {
            shadowed: listing.shadowed,
            skipped: listing.skipped,
            ..Default::default()
        };

        for slug in listing.files.keys() {
            match self.load(slug.as_str()).await? {
                Lookup::Found(post) => report.posts.push(post.into_meta()),
                Lookup::NotFound => {
                    debug!(%slug, "Content unit disappeared during scan");
                }
                Lookup::Malformed { path, error } => {
                    warn!(path = %path.display(), %error, "Skipping malformed content unit");
                    report.malformed.push((path, error.to_string()));
                }
            }
        }

        sort_newest_first(&mut report.posts);
        Ok(report)
    }

    /// First existing candidate file for a slug, in extension priority order
    async fn resolve(&self, slug: &Slug) -> Result<Option<PathBuf>, StoreError> {
        for ext in EXTENSIONS {
            let path = self.root.join(format!("{}.{}", slug, ext));
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => return Ok(Some(path)),
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::unavailable(&path, e)),
            }
        }
        Ok(None)
    }

    async fn read_listing(&self) -> Result<Listing, StoreError> {
        let mut listing = Listing::default();

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "Content directory does not exist");
                return Ok(listing);
            }
            Err(e) => return Err(StoreError::unavailable(&self.root, e)),
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return Err(StoreError::unavailable(&self.root, e)),
            };
            let path = entry.path();

            let Some((stem, rank)) = content_stem(&path) else {
                continue;
            };

            // Follows symlinks; dangling links and directories are ignored
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {}
                _ => continue,
            }

            let slug = match Slug::parse(stem) {
                Ok(slug) => slug,
                Err(e) => {
                    warn!(path = %path.display(), %e, "Skipping content file with unusable name");
                    listing.skipped.push(path);
                    continue;
                }
            };

            match listing.files.get_mut(&slug) {
                Some(existing) if existing.0 <= rank => {
                    listing.shadowed.push(path);
                }
                Some(existing) => {
                    let loser = std::mem::replace(existing, (rank, path));
                    listing.shadowed.push(loser.1);
                }
                None => {
                    listing.files.insert(slug, (rank, path));
                }
            }
        }

        for path in &listing.shadowed {
            warn!(path = %path.display(), "Content file shadowed by a higher-priority extension");
        }
        listing.shadowed.sort();
        listing.skipped.sort();

        Ok(listing)
    }

    fn build_post(&self, slug: Slug, text: &str) -> Result<NewsPost, ParseError> {
        let (fm, body) = front_matter::parse(text)?;
        let defaults = &self.defaults;

        let published_at = match fm.published_at()? {
            Some(date) => date,
            None => match defaults.missing_date {
                MissingDate::Now => self.clock.now(),
                // Unix epoch
                MissingDate::Epoch => DateTime::<Utc>::default(),
            },
        };

        let or_default = |value: &Option<String>, fallback: &str| {
            non_empty(value).unwrap_or(fallback).to_string()
        };

        Ok(NewsPost {
            meta: NewsMeta {
                title: or_default(&fm.title, &defaults.title),
                summary: or_default(&fm.excerpt, &defaults.summary),
                published_at,
                author: or_default(&fm.author, &defaults.author),
                hero_image: or_default(&fm.image, &defaults.image),
                category: or_default(&fm.category, &defaults.category),
                slug,
            },
            body: body.to_string(),
        })
    }
}

/// File stem and extension rank, if the path names a content file
fn content_stem(path: &Path) -> Option<(&str, usize)> {
    let ext = path.extension()?.to_str()?;
    let rank = EXTENSIONS.iter().position(|candidate| *candidate == ext)?;
    let stem = path.file_stem()?.to_str()?;
    Some((stem, rank))
}

/// Order by publication date, newest first; equal dates by slug ascending
pub fn sort_newest_first(posts: &mut [NewsMeta]) {
    posts.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}
