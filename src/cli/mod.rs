//! Command-line interface for newsroom.
//!
//! Provides commands for inspecting the news content, validating it,
//! and writing the site's page data.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::content::{NewsMeta, ScanReport};
use crate::site::{ContentWatcher, RebuildEvent, Site, SiteBuilder, WatchConfig};

/// newsroom - news content store and site data generator
#[derive(Parser, Debug)]
#[command(name = "newsroom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content directory (overrides config and NEWSROOM_CONTENT_DIR)
    #[arg(long, global = true)]
    pub content_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List news posts, newest first
    List {
        /// Maximum number of posts to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show posts in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single post
    Show {
        /// Post slug
        slug: String,

        /// Include the body
        #[arg(short, long)]
        full: bool,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the detail page paths
    Paths,

    /// Print the page props for a route as JSON
    Page {
        /// Site-relative path, e.g. /news/pod-unveiling
        route: String,
    },

    /// Check every content file and report problems
    Validate,

    /// Write the site's page data
    Build {
        /// Output directory (overrides config and NEWSROOM_OUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Fail if any content file is malformed, shadowed or badly named
        #[arg(long)]
        strict: bool,
    },

    /// Build, then rebuild whenever the content changes
    Watch {
        /// Output directory (overrides config and NEWSROOM_OUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show resolved configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut cfg = config::load_config()?;
        if let Some(dir) = self.content_dir {
            cfg.content_dir = dir;
        }

        match self.command {
            Commands::List {
                limit,
                category,
                json,
            } => list_posts(&cfg, limit, category.as_deref(), json).await,
            Commands::Show { slug, full, json } => show_post(&cfg, &slug, full, json).await,
            Commands::Paths => list_paths(&cfg).await,
            Commands::Page { route } => show_page(&cfg, &route).await,
            Commands::Validate => validate(&cfg).await,
            Commands::Build { out, strict } => build(&cfg, out, strict).await,
            Commands::Watch { out } => watch(&cfg, out).await,
            Commands::Config => {
                show_config(&cfg);
                Ok(())
            }
        }
    }
}

/// Keep posts whose category matches, ignoring case
pub fn filter_by_category(posts: Vec<NewsMeta>, category: &str) -> Vec<NewsMeta> {
    let wanted = category.to_lowercase();
    posts
        .into_iter()
        .filter(|post| post.category.to_lowercase() == wanted)
        .collect()
}

/// Shorten to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// List posts
async fn list_posts(
    cfg: &ResolvedConfig,
    limit: Option<usize>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut posts = cfg.store().list_summaries().await?;
    if let Some(category) = category {
        posts = filter_by_category(posts, category);
    }
    if let Some(limit) = limit {
        posts.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No news posts found in {}", cfg.content_dir.display());
        return Ok(());
    }

    println!("{:<12} {:<30} {:<12} {:<40}", "DATE", "SLUG", "CATEGORY", "TITLE");
    println!("{}", "-".repeat(96));

    for post in &posts {
        println!(
            "{:<12} {:<30} {:<12} {:<40}",
            post.published_at.format("%Y-%m-%d"),
            truncate(post.slug.as_str(), 30),
            truncate(&post.category, 12),
            truncate(&post.title, 40)
        );
    }

    println!("\nTotal: {} posts", posts.len());

    Ok(())
}

/// Show a single post
async fn show_post(cfg: &ResolvedConfig, slug: &str, full: bool, json: bool) -> Result<()> {
    let post = cfg
        .store()
        .get(slug)
        .await?
        .with_context(|| format!("News post not found: {}", slug))?;

    if json {
        if full {
            println!("{}", serde_json::to_string_pretty(&post)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&post.meta)?);
        }
        return Ok(());
    }

    let meta = &post.meta;
    println!("Slug:     {}", meta.slug);
    println!("Title:    {}", meta.title);
    println!("Date:     {}", meta.published_at.to_rfc3339());
    println!("Author:   {}", meta.author);
    println!("Category: {}", meta.category);
    println!("Image:    {}", meta.hero_image);
    if !meta.summary.is_empty() {
        println!("Excerpt:  {}", meta.summary);
    }

    if full {
        println!("\n{}", post.body);
    } else {
        println!("\nUse --full to show the body");
    }

    Ok(())
}

/// Print detail page paths
async fn list_paths(cfg: &ResolvedConfig) -> Result<()> {
    let site = Site::from_config(cfg);
    for path in site.static_paths().await? {
        println!("{}", path);
    }
    Ok(())
}

/// Print the page props for a route
async fn show_page(cfg: &ResolvedConfig, route: &str) -> Result<()> {
    let site = Site::from_config(cfg);
    let page = site.render(route).await?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    if page.is_not_found() {
        eprintln!("\n[{} resolves to the not-found page]", route);
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!("Valid posts: {}", report.posts.len());

    if !report.malformed.is_empty() {
        println!("\nMalformed:");
        for (path, reason) in &report.malformed {
            println!("  {}: {}", path.display(), reason);
        }
    }
    if !report.shadowed.is_empty() {
        println!("\nShadowed by a higher-priority extension:");
        for path in &report.shadowed {
            println!("  {}", path.display());
        }
    }
    if !report.skipped.is_empty() {
        println!("\nFile name is not a usable slug:");
        for path in &report.skipped {
            println!("  {}", path.display());
        }
    }
}

/// Check the content directory
async fn validate(cfg: &ResolvedConfig) -> Result<()> {
    let report = cfg.store().scan().await?;
    print_report(&report);

    if !report.is_clean() {
        anyhow::bail!("Content validation failed");
    }
    println!("\nAll content files are valid");
    Ok(())
}

/// Write the site's page data
async fn build(cfg: &ResolvedConfig, out: Option<PathBuf>, strict: bool) -> Result<()> {
    let out_dir = out.unwrap_or_else(|| cfg.out_dir.clone());
    let builder = SiteBuilder::new(Site::from_config(cfg)).strict(strict);

    let summary = builder
        .build(&out_dir)
        .await
        .with_context(|| format!("Failed to build site data into {}", out_dir.display()))?;

    eprintln!(
        "Built {} post page(s), {} file(s) in {}",
        summary.posts,
        summary.manifest.pages.len(),
        summary.out_dir.display()
    );
    for slug in &summary.not_found {
        eprintln!("  no page for {} (not found or malformed)", slug);
    }

    Ok(())
}

/// Build once, then rebuild on every content change until Ctrl-C
async fn watch(cfg: &ResolvedConfig, out: Option<PathBuf>) -> Result<()> {
    let out_dir = out.unwrap_or_else(|| cfg.out_dir.clone());
    let builder = SiteBuilder::new(Site::from_config(cfg));

    let summary = builder.build(&out_dir).await?;
    eprintln!("Built {} post page(s) in {}", summary.posts, out_dir.display());

    let watcher = ContentWatcher::new(WatchConfig::new(&cfg.content_dir, &out_dir), builder);
    let (mut events, handle) = watcher.watch()?;

    eprintln!("Watching {} (Ctrl-C to stop)", cfg.content_dir.display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(RebuildEvent::Built(summary)) => {
                    eprintln!("Rebuilt {} post page(s)", summary.posts);
                }
                Some(RebuildEvent::Failed(error)) => {
                    eprintln!("Rebuild failed: {}", error);
                }
                None => break,
            },
        }
    }

    handle.stop().await
}

/// Print resolved configuration
fn show_config(cfg: &ResolvedConfig) {
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Content: {}", cfg.content_dir.display());
    println!("  Output:  {}", cfg.out_dir.display());
    println!();
    println!("Site:");
    println!("  Name: {}", cfg.site.name);
    println!("  URL:  {}", cfg.site.url);
    println!("  Home page posts: {}", cfg.recent_posts);
    println!();
    println!("Defaults for missing metadata:");
    println!("  title:    {}", cfg.defaults.title);
    println!("  excerpt:  {:?}", cfg.defaults.summary);
    println!("  author:   {}", cfg.defaults.author);
    println!("  image:    {}", cfg.defaults.image);
    println!("  category: {}", cfg.defaults.category);
    println!("  date:     {}", cfg.defaults.missing_date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Slug;
    use chrono::Utc;

    fn meta(slug: &str, category: &str) -> NewsMeta {
        NewsMeta {
            slug: Slug::parse(slug).unwrap(),
            title: slug.to_string(),
            summary: String::new(),
            published_at: Utc::now(),
            author: String::new(),
            hero_image: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_filter_by_category_ignores_case() {
        let posts = vec![meta("a", "Events"), meta("b", "News"), meta("c", "events")];
        let filtered = filter_by_category(posts, "EVENTS");

        let slugs: Vec<_> = filtered.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 5), "éé...");
    }

    #[test]
    fn test_cli_parses_build_flags() {
        let cli = Cli::parse_from(["newsroom", "--content-dir", "posts", "build", "--strict"]);

        assert_eq!(cli.content_dir, Some(PathBuf::from("posts")));
        assert!(matches!(cli.command, Commands::Build { strict: true, out: None }));
    }
}
