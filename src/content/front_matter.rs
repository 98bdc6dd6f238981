//! Front-matter parsing for content files.
//!
//! A content file may open with a YAML metadata block fenced by `---`
//! lines:
//!
//! ```text
//! ---
//! title: Pod unveiled
//! date: 2024-06-15
//! ---
//! Body text starts here.
//! ```
//!
//! Everything after the closing fence line is the body, byte for byte.
//! A file that does not start with a fence has no metadata and is all body.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Fence line that opens and closes the metadata block
pub const FENCE: &str = "---";

/// Reasons a content file is rejected
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Content is not valid UTF-8")]
    NotUtf8,

    #[error("Metadata block is not closed by a `---` line")]
    Unterminated,

    #[error("Invalid metadata YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unrecognised date: {0:?}")]
    InvalidDate(String),
}

/// Recognised metadata keys. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl FrontMatter {
    /// Parse the `date` key, if present and non-empty
    pub fn published_at(&self) -> Result<Option<DateTime<Utc>>, ParseError> {
        match non_empty(&self.date) {
            Some(raw) => parse_date(raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Treat an empty string the same as a missing key
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Split raw text into the metadata block (without fences) and the body
pub fn split(input: &str) -> Result<(Option<&str>, &str), ParseError> {
    let (first, rest_start) = match input.find('\n') {
        Some(end) => (&input[..end], end + 1),
        None => (input, input.len()),
    };

    if first.trim_end() != FENCE {
        return Ok((None, input));
    }

    let mut pos = rest_start;
    while pos < input.len() {
        let (line, next) = match input[pos..].find('\n') {
            Some(offset) => (&input[pos..pos + offset], pos + offset + 1),
            None => (&input[pos..], input.len()),
        };
        if line.trim_end() == FENCE {
            return Ok((Some(&input[rest_start..pos]), &input[next..]));
        }
        pos = next;
    }

    Err(ParseError::Unterminated)
}

/// Parse a whole content file into metadata and body
pub fn parse(input: &str) -> Result<(FrontMatter, &str), ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let (block, body) = split(input)?;

    let front_matter = match block {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => FrontMatter::default(),
    };

    Ok((front_matter, body))
}

/// Parse a publication date.
///
/// Accepts RFC 3339 timestamps, naive date-times (taken as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ParseError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_without_block_keeps_everything_as_body() {
        let text = "Just a body\n---\nwith a rule\n";
        let (block, body) = split(text).unwrap();

        assert!(block.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_separates_block_and_body() {
        let text = "---\ntitle: Hello\n---\nBody line\n\nSecond paragraph\n";
        let (block, body) = split(text).unwrap();

        assert_eq!(block, Some("title: Hello\n"));
        assert_eq!(body, "Body line\n\nSecond paragraph\n");
    }

    #[test]
    fn test_split_tolerates_crlf_fences() {
        let text = "---\r\ntitle: Hello\r\n---\r\nBody\r\n";
        let (block, body) = split(text).unwrap();

        assert_eq!(block, Some("title: Hello\r\n"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_split_block_at_end_of_file() {
        let (block, body) = split("---\ntitle: Only meta\n---").unwrap();

        assert_eq!(block, Some("title: Only meta\n"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_unterminated_block() {
        assert!(matches!(
            split("---\ntitle: Hello\nno closing fence\n"),
            Err(ParseError::Unterminated)
        ));
        assert!(matches!(split("---"), Err(ParseError::Unterminated)));
    }

    #[test]
    fn test_parse_reads_known_keys_and_ignores_others() {
        let text = "---\ntitle: Pod unveiled\nexcerpt: First look\ndate: 2024-06-15\nauthor: Asha\nimage: /images/pod.jpg\ncategory: Events\ntags: [a, b]\n---\nBody\n";
        let (fm, body) = parse(text).unwrap();

        assert_eq!(fm.title.as_deref(), Some("Pod unveiled"));
        assert_eq!(fm.excerpt.as_deref(), Some("First look"));
        assert_eq!(fm.date.as_deref(), Some("2024-06-15"));
        assert_eq!(fm.author.as_deref(), Some("Asha"));
        assert_eq!(fm.image.as_deref(), Some("/images/pod.jpg"));
        assert_eq!(fm.category.as_deref(), Some("Events"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_parse_empty_block() {
        let (fm, body) = parse("---\n---\nBody").unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let (fm, body) = parse("\u{feff}---\ntitle: Hi\n---\nBody").unwrap();

        assert_eq!(fm.title.as_deref(), Some("Hi"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_rejects_non_mapping_block() {
        assert!(matches!(
            parse("---\n- just\n- a list\n---\nBody"),
            Err(ParseError::Yaml(_))
        ));
        assert!(matches!(
            parse("---\ntitle: [unclosed\n---\nBody"),
            Err(ParseError::Yaml(_))
        ));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let (fm, _) = parse("---\ntitle: \"\"\nauthor:\n---\n").unwrap();

        assert_eq!(non_empty(&fm.title), None);
        assert_eq!(non_empty(&fm.author), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let ten = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();

        assert_eq!(parse_date("2024-06-15").unwrap(), midnight);
        assert_eq!(parse_date(" 2024-06-15 ").unwrap(), midnight);
        assert_eq!(parse_date("2024-06-15T10:00:00Z").unwrap(), ten);
        assert_eq!(parse_date("2024-06-15T12:00:00+02:00").unwrap(), ten);
        assert_eq!(parse_date("2024-06-15T10:00:00").unwrap(), ten);
        assert_eq!(parse_date("2024-06-15 10:00:00").unwrap(), ten);
        assert_eq!(parse_date("2024-06-15T10:00:00.000Z").unwrap(), ten);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("last tuesday"), Err(ParseError::InvalidDate(_))));
        assert!(matches!(parse_date("2024-13-01"), Err(ParseError::InvalidDate(_))));
    }

    #[test]
    fn test_published_at_missing_or_empty() {
        let fm = FrontMatter {
            date: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(fm.published_at().unwrap(), None);
        assert_eq!(FrontMatter::default().published_at().unwrap(), None);
    }
}
