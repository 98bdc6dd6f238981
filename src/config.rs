//! Configuration for newsroom.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of the resolved config)
//! 2. Environment variables (NEWSROOM_CONTENT_DIR, NEWSROOM_OUT_DIR)
//! 3. Config file (.newsroom/config.yaml)
//! 4. Defaults (content/news, out)
//!
//! Config file discovery:
//! - Searches the start directory and its parents for .newsroom/config.yaml
//! - Paths in the config file are relative to the project root, the
//!   directory that contains .newsroom/

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::content::{Clock, ContentStore, SystemClock, UnitDefaults};

/// Environment variable overriding the content directory
pub const ENV_CONTENT_DIR: &str = "NEWSROOM_CONTENT_DIR";

/// Environment variable overriding the output directory
pub const ENV_OUT_DIR: &str = "NEWSROOM_OUT_DIR";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub site: SiteInfo,
    #[serde(default)]
    pub defaults: UnitDefaults,
    #[serde(default)]
    pub home: HomeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Content directory (relative to project root)
    pub content: Option<String>,
    /// Build output directory (relative to project root)
    pub out: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeConfig {
    /// Number of posts shown in the home page news section
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            recent_posts: default_recent_posts(),
        }
    }
}

fn default_recent_posts() -> usize {
    3
}

/// Site-wide metadata used for SEO tags and absolute URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_site_tagline")]
    pub tagline: String,
    #[serde(default = "default_site_description")]
    pub description: String,
    /// Public origin, no trailing slash
    #[serde(default = "default_site_url")]
    pub url: String,
}

fn default_site_name() -> String {
    "Hyperloopin".to_string()
}
fn default_site_tagline() -> String {
    "Engineering the Future of Transportation".to_string()
}
fn default_site_description() -> String {
    "Join Hyperloopin, a leading university engineering club pioneering hyperloop technology. \
     Building the future of sustainable high-speed transportation."
        .to_string()
}
fn default_site_url() -> String {
    "https://hyperloopin.edu".to_string()
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            tagline: default_site_tagline(),
            description: default_site_description(),
            url: default_site_url(),
        }
    }
}

impl SiteInfo {
    /// Absolute URL for a site-relative path
    pub fn absolute(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Apply the `"%s | <site name>"` title template
    pub fn page_title(&self, title: &str) -> String {
        format!("{} | {}", title, self.name)
    }
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub content_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read NEWSROOM_* variables from the process environment
    pub fn from_env() -> Self {
        Self {
            content_dir: std::env::var_os(ENV_CONTENT_DIR).map(PathBuf::from),
            out_dir: std::env::var_os(ENV_OUT_DIR).map(PathBuf::from),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding the content files
    pub content_dir: PathBuf,
    /// Directory the site data is written to
    pub out_dir: PathBuf,
    /// Site metadata
    pub site: SiteInfo,
    /// Placeholders for missing metadata
    pub defaults: UnitDefaults,
    /// Posts on the home page
    pub recent_posts: usize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Content store over the configured directory, using the wall clock
    pub fn store(&self) -> ContentStore {
        self.store_with_clock(Arc::new(SystemClock))
    }

    /// Content store with an explicit clock
    pub fn store_with_clock(&self, clock: Arc<dyn Clock>) -> ContentStore {
        ContentStore::new(&self.content_dir)
            .with_defaults(self.defaults.clone())
            .with_clock(clock)
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".newsroom").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Resolve configuration starting the config file search at `start`
pub fn load_config_from(start: &Path, env: &EnvOverrides) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start);

    let Some(config_path) = config_file else {
        return Ok(ResolvedConfig {
            content_dir: env
                .content_dir
                .clone()
                .unwrap_or_else(|| start.join("content").join("news")),
            out_dir: env.out_dir.clone().unwrap_or_else(|| start.join("out")),
            site: SiteInfo::default(),
            defaults: UnitDefaults::default(),
            recent_posts: default_recent_posts(),
            config_file: None,
        });
    };

    let config = load_config_file(&config_path)?;

    // Project root is the parent of .newsroom/ (grandparent of config.yaml)
    let base_dir = config_path
        .parent()
        .and_then(|p| p.parent())
        .unwrap_or(start);

    let content_dir = match (&env.content_dir, &config.paths.content) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => resolve_path(base_dir, dir),
        (None, None) => base_dir.join("content").join("news"),
    };

    let out_dir = match (&env.out_dir, &config.paths.out) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => resolve_path(base_dir, dir),
        (None, None) => base_dir.join("out"),
    };

    Ok(ResolvedConfig {
        content_dir,
        out_dir,
        site: config.site,
        defaults: config.defaults,
        recent_posts: config.home.recent_posts,
        config_file: Some(config_path),
    })
}

/// Resolve configuration from the current directory and process environment
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd, &EnvOverrides::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MissingDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(".newsroom");
        std::fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(temp.path(), &EnvOverrides::default()).unwrap();

        assert_eq!(config.content_dir, temp.path().join("content").join("news"));
        assert_eq!(config.out_dir, temp.path().join("out"));
        assert_eq!(config.site.name, "Hyperloopin");
        assert_eq!(config.recent_posts, 3);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1"
paths:
  content: posts
  out: public/data
site:
  name: Loop Club
  url: https://loop.example.org/
defaults:
  author: Editorial Desk
  missing_date: epoch
home:
  recent_posts: 5
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1");
        assert_eq!(config.paths.content, Some("posts".to_string()));
        assert_eq!(config.site.name, "Loop Club");
        assert_eq!(config.site.tagline, default_site_tagline());
        assert_eq!(config.defaults.author, "Editorial Desk");
        assert_eq!(config.defaults.category, "News");
        assert_eq!(config.defaults.missing_date, MissingDate::Epoch);
        assert_eq!(config.home.recent_posts, 5);
    }

    #[test]
    fn test_discovery_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: \"1\"\npaths:\n  content: posts\n");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(temp.path().join("posts")).unwrap();

        let config = load_config_from(&nested, &EnvOverrides::default()).unwrap();

        assert!(config.config_file.is_some());
        assert_eq!(
            config.content_dir,
            temp.path().join("posts").canonicalize().unwrap()
        );
        assert_eq!(config.out_dir, temp.path().join("out"));
    }

    #[test]
    fn test_env_overrides_config_file() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: \"1\"\npaths:\n  content: posts\n  out: dist\n");

        let env = EnvOverrides {
            content_dir: Some(PathBuf::from("/srv/news")),
            out_dir: None,
        };
        let config = load_config_from(temp.path(), &env).unwrap();

        assert_eq!(config.content_dir, PathBuf::from("/srv/news"));
        assert_eq!(config.out_dir, temp.path().join("dist"));
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "paths: [not, a, mapping]");

        assert!(load_config_from(temp.path(), &EnvOverrides::default()).is_err());
    }

    #[test]
    fn test_site_urls() {
        let site = SiteInfo {
            url: "https://hyperloopin.edu/".to_string(),
            ..Default::default()
        };

        assert_eq!(site.absolute("/news/pod"), "https://hyperloopin.edu/news/pod");
        assert_eq!(site.absolute("images/a.jpg"), "https://hyperloopin.edu/images/a.jpg");
        assert_eq!(site.page_title("Pod unveiled"), "Pod unveiled | Hyperloopin");
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
