//! Placeholder values for metadata keys a content file leaves out.

use serde::{Deserialize, Serialize};

/// What to use as the publication date of a unit without `date`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDate {
    /// Ingestion time, taken from the store's clock. Output is not
    /// reproducible across builds for undated units.
    #[default]
    Now,

    /// 1970-01-01T00:00:00Z, so undated units sort last
    Epoch,
}

impl std::fmt::Display for MissingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingDate::Now => write!(f, "now"),
            MissingDate::Epoch => write!(f, "epoch"),
        }
    }
}

impl std::str::FromStr for MissingDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "now" => Ok(MissingDate::Now),
            "epoch" => Ok(MissingDate::Epoch),
            _ => anyhow::bail!("Unknown missing-date policy: {}", s),
        }
    }
}

/// Placeholder metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefaults {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_image")]
    pub image: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub missing_date: MissingDate,
}

fn default_title() -> String {
    "Untitled".to_string()
}
fn default_author() -> String {
    "Hyperloopin Team".to_string()
}
fn default_image() -> String {
    "/images/news/default.jpg".to_string()
}
fn default_category() -> String {
    "News".to_string()
}

impl Default for UnitDefaults {
    fn default() -> Self {
        Self {
            title: default_title(),
            summary: String::new(),
            author: default_author(),
            image: default_image(),
            category: default_category(),
            missing_date: MissingDate::default(),
        }
    }
}
