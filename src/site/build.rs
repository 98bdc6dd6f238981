//! Writes page data for the whole site to an output directory.
//!
//! Output layout:
//!
//! ```text
//! out/
//! ├── index.json          # HomePage
//! ├── 404.json            # NotFoundPage
//! ├── paths.json          # detail paths that were generated
//! ├── manifest.json       # sha256 + size of every file above
//! └── news/
//!     ├── index.json      # NewsIndexPage
//!     └── <slug>.json     # NewsPostPage, one per post
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use super::routes;
use super::Site;
use crate::content::{ScanReport, Slug, StoreError};

/// Errors that can occur during a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize page data for {route}: {source}")]
    Serialize {
        route: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Content validation failed: {malformed} malformed, {shadowed} shadowed, {skipped} unusable file name(s)"
    )]
    Validation {
        malformed: usize,
        shadowed: usize,
        skipped: usize,
    },

    #[error("Page generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One written file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Route the file serves (or a pseudo-route for data files)
    pub route: String,
    /// Path relative to the output directory, `/`-separated
    pub file: String,
    /// "sha256:<hex>"
    pub sha256: String,
    pub bytes: u64,
}

/// Record of a build, written as manifest.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<ManifestEntry>,
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub out_dir: PathBuf,
    /// Number of detail pages written
    pub posts: usize,
    /// Identifiers listed in the content directory that produced no page
    pub not_found: Vec<Slug>,
    pub manifest: Manifest,
}

/// Generates the site's page data
#[derive(Debug, Clone)]
pub struct SiteBuilder {
    site: Site,
    strict: bool,
}

impl SiteBuilder {
    pub fn new(site: Site) -> Self {
        Self {
            site,
            strict: false,
        }
    }

    /// Fail the build when any content file was left out of the listing
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Write every page under `out_dir`
    pub async fn build(&self, out_dir: &Path) -> Result<BuildSummary, BuildError> {
        // Undated posts must get the same date in every page of one build
        let site = self.site.pinned_at(self.site.store().now());
        let store = site.store();
        let report = store.scan().await?;
        self.check(&report)?;

        info!(
            content = %store.root().display(),
            out = %out_dir.display(),
            posts = report.posts.len(),
            "Building site data"
        );

        let news_dir = out_dir.join("news");
        match fs::remove_dir_all(&news_dir).await {
            Ok(()) => debug!(dir = %news_dir.display(), "Removed previous news output"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(write_error(&news_dir, e)),
        }
        fs::create_dir_all(&news_dir)
            .await
            .map_err(|e| write_error(&news_dir, e))?;

        let mut entries = vec![
            write_page(out_dir, "index.json", "/", &site.home_page(&report.posts)).await?,
            write_page(
                out_dir,
                "news/index.json",
                "/news",
                &site.news_index_page(report.posts.clone()),
            )
            .await?,
            write_page(out_dir, "404.json", "/404", &site.not_found_page()).await?,
        ];

        let tasks: Vec<_> = store
            .list_slugs()
            .await?
            .into_iter()
            .map(|slug| {
                tokio::spawn(generate_post(site.clone(), out_dir.to_path_buf(), slug))
            })
            .collect();

        let mut paths = Vec::new();
        let mut not_found = Vec::new();
        for task in tasks {
            match task.await?? {
                (_, Some(entry)) => {
                    paths.push(entry.route.clone());
                    entries.push(entry);
                }
                (slug, None) => {
                    warn!(%slug, "No page generated for listed identifier");
                    not_found.push(slug);
                }
            }
        }
        let posts = paths.len();
        paths.sort();
        not_found.sort();

        entries.push(write_page(out_dir, "paths.json", "paths", &paths).await?);
        entries.sort_by(|a, b| a.file.cmp(&b.file));

        let manifest = Manifest {
            generated_at: store.now(),
            pages: entries,
        };
        write_page(out_dir, "manifest.json", "manifest", &manifest).await?;

        info!(posts, pages = manifest.pages.len(), "Site data written");

        Ok(BuildSummary {
            out_dir: out_dir.to_path_buf(),
            posts,
            not_found,
            manifest,
        })
    }

    fn check(&self, report: &ScanReport) -> Result<(), BuildError> {
        if !self.strict || report.is_clean() {
            return Ok(());
        }
        Err(BuildError::Validation {
            malformed: report.malformed.len(),
            shadowed: report.shadowed.len(),
            skipped: report.skipped.len(),
        })
    }
}

/// Write the detail page for one identifier
async fn generate_post(
    site: Site,
    out_dir: PathBuf,
    slug: Slug,
) -> Result<(Slug, Option<ManifestEntry>), BuildError> {
    let Some(page) = site.post_page(slug.as_str()).await? else {
        return Ok((slug, None));
    };
    let route = routes::post_path(slug.as_str());
    let file = format!("news/{}.json", slug);
    let entry = write_page(&out_dir, &file, &route, &page).await?;
    Ok((slug, Some(entry)))
}

fn write_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Serialize `value` as pretty JSON into `out_dir/file`
async fn write_page<T: Serialize>(
    out_dir: &Path,
    file: &str,
    route: &str,
    value: &T,
) -> Result<ManifestEntry, BuildError> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| BuildError::Serialize {
        route: route.to_string(),
        source,
    })?;

    let path = out_dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(parent, e))?;
    }
    fs::write(&path, &json)
        .await
        .map_err(|e| write_error(&path, e))?;

    debug!(path = %path.display(), bytes = json.len(), "Wrote page data");

    Ok(ManifestEntry {
        route: route.to_string(),
        file: file.to_string(),
        sha256: compute_hash(&json),
        bytes: json.len() as u64,
    })
}

/// SHA256 of a byte slice as "sha256:<hex>"
pub fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("sha256:{}", hex::encode(result))
}
