//! The manifest seam between a parsed package description and the archive
//! engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::xml::XmlError;

/// Errors that can occur when loading, validating, or serializing a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// An I/O error occurred while reading a manifest file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML content could not be deserialized into a manifest.
    #[error("Parse error: {0}")]
    Parse(#[from] quick_xml::de::DeError),

    /// The manifest could not be rendered back to XML.
    #[error("Serialize error: {0}")]
    Serialize(#[from] XmlError),

    /// A required metadata field is missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// One `<file src=".." target=".." exclude=".."/>` selection rule.
///
/// `source` is a glob pattern relative to the package base directory. When
/// `target` is set, every match is placed directly under it by base file
/// name; otherwise the match keeps its base-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRule {
    /// Glob pattern relative to the base directory.
    #[serde(rename = "@src")]
    pub source: String,
    /// Directory inside the archive that receives every match.
    #[serde(rename = "@target", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// `;`-separated glob patterns removing matches of this rule.
    #[serde(rename = "@exclude", default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl FileRule {
    /// Rule that keeps each match at its base-relative path.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Place every match of this rule under `target`.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Drop matches of any of the `;`-separated `patterns`.
    pub fn with_exclude(mut self, patterns: impl Into<String>) -> Self {
        self.exclude = Some(patterns.into());
        self
    }

    /// Exclude patterns split on `;`, trimmed, with blanks removed.
    pub fn exclude_patterns(&self) -> impl Iterator<Item = &str> {
        self.exclude
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Read-only view of a package manifest, as consumed by the archive engine.
pub trait Manifest {
    /// Package identifier; also names the manifest document in the archive.
    fn id(&self) -> &str;

    /// Package version string.
    fn version(&self) -> &str;

    /// Comma-separated author list.
    fn authors(&self) -> &str;

    /// Human-readable package description.
    fn description(&self) -> &str;

    /// Space-separated tag list.
    fn tags(&self) -> Option<&str>;

    /// File selection rules; empty means "include everything".
    fn file_rules(&self) -> &[FileRule];

    /// Serialize the manifest document to bytes.
    fn to_bytes(&self) -> Result<Vec<u8>, ManifestError>;

    /// Extension of the manifest document, without the leading dot.
    fn extension(&self) -> &str {
        crate::NUSPEC_EXTENSION
    }

    /// File name of the manifest document: `<id>.<extension>`.
    fn file_name(&self) -> String {
        format!("{}.{}", self.id(), self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_patterns_split() {
        let rule = FileRule::new("lib/**").with_exclude(" **/*.pdb ;; docs/* ");
        let patterns: Vec<&str> = rule.exclude_patterns().collect();
        assert_eq!(patterns, vec!["**/*.pdb", "docs/*"]);
    }

    #[test]
    fn test_exclude_patterns_empty() {
        let rule = FileRule::new("lib/*.dll").with_target("lib/net45");
        assert_eq!(rule.exclude_patterns().count(), 0);
        assert_eq!(rule.target.as_deref(), Some("lib/net45"));
    }
}
