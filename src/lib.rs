//! newsroom - file-backed news content and static site data
//!
//! News posts live as `.mdx` (or `.md`) files in a single directory,
//! one post per file, each with an optional YAML front matter block.
//! The file stem is the post's slug.
//!
//! # Modules
//!
//! - `content`: Content store (listing, lookup, front matter, defaults)
//! - `site`: Page props, routing, the site data builder and watch mode
//! - `config`: Layered configuration (flags, env, config file, defaults)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List posts, newest first
//! newsroom list
//!
//! # Write page data for every route
//! newsroom build --out out --strict
//!
//! # Rebuild on every content change
//! newsroom watch
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod site;

pub use config::{load_config, ResolvedConfig, SiteInfo};
pub use content::{ContentStore, Lookup, NewsMeta, NewsPost, ScanReport, Slug, StoreError};
pub use site::{BuildSummary, Page, Route, Site, SiteBuilder};
