//! Parsed dot-delimited paths
#![allow(clippy::must_use_candidate)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator between path segments.
pub const DELIMITER: char = '.';

/// A parsed nested path, e.g. `"order.lines[0].sku"`
///
/// Bracketed indices are sugar for a plain segment, so `lines[0]` and
/// `lines.0` address the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    /// Path as written by the caller
    raw: String,

    /// Segments in traversal order, never empty
    segments: Vec<String>,
}

impl Path {
    /// Parse a path string into its segments
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path, an empty segment (`"a..b"`), or a
    /// malformed bracket index.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_path(raw, "path is empty"));
        }

        let mut segments = Vec::new();
        for part in raw.split(DELIMITER) {
            if part.is_empty() {
                return Err(Error::invalid_path(raw, "path contains an empty segment"));
            }
            push_segments(raw, part, &mut segments)?;
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Get the path as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the parsed segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Split one delimited part into a name and any trailing `[n]` indices.
fn push_segments(raw: &str, part: &str, segments: &mut Vec<String>) -> Result<()> {
    let Some(open_bracket) = part.find('[') else {
        segments.push(part.to_string());
        return Ok(());
    };

    let name = &part[..open_bracket];
    if !name.is_empty() {
        segments.push(name.to_string());
    }

    let mut rest = &part[open_bracket..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[').ok_or_else(|| {
            Error::invalid_path(raw, format!("unexpected characters after index in '{part}'"))
        })?;
        let close_bracket = inner
            .find(']')
            .ok_or_else(|| Error::invalid_path(raw, format!("unclosed bracket in '{part}'")))?;

        let index = &inner[..close_bracket];
        if index.parse::<usize>().is_err() {
            return Err(Error::invalid_path(
                raw,
                format!("invalid index '{index}' in '{part}'"),
            ));
        }
        segments.push(index.to_string());
        rest = &inner[close_bracket + 1..];
    }

    Ok(())
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Path {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.raw
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        let path = Path::parse("name").unwrap();
        assert_eq!(path.segments(), &["name"]);
        assert_eq!(path.as_str(), "name");
    }

    #[test]
    fn test_parse_nested_segments() {
        let path = Path::parse("a.b.c").unwrap();
        assert_eq!(path.segments(), &["a", "b", "c"]);
    }

    #[test]
    fn test_parse_bracket_index() {
        let path = Path::parse("lines[0].sku").unwrap();
        assert_eq!(path.segments(), &["lines", "0", "sku"]);

        let nested = Path::parse("grid[1][2]").unwrap();
        assert_eq!(nested.segments(), &["grid", "1", "2"]);
    }

    #[test]
    fn test_parse_empty_path() {
        let err = Path::parse("").unwrap_err();
        assert!(err.to_string().contains("path is empty"));
    }

    #[test]
    fn test_parse_empty_segment() {
        for raw in ["a..b", ".a", "a."] {
            match Path::parse(raw) {
                Err(Error::InvalidPath { path, reason }) => {
                    assert_eq!(path, raw);
                    assert!(reason.contains("empty segment"));
                }
                other => panic!("Expected InvalidPath for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_malformed_brackets() {
        assert!(Path::parse("items[0").is_err());
        assert!(Path::parse("items[x]").is_err());
        assert!(Path::parse("items[0]x").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let path: Path = serde_json::from_str("\"user.email\"").unwrap();
        assert_eq!(path.segments(), &["user", "email"]);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"user.email\"");

        let invalid: std::result::Result<Path, _> = serde_json::from_str("\"\"");
        assert!(invalid.is_err());
    }
}
