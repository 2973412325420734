//! Errors raised while assembling a package archive.

use std::path::PathBuf;

use nupack_schema::{ManifestError, XmlError};
use thiserror::Error;

/// Errors that abort a pack. No partial archive is returned alongside any of
/// them.
#[derive(Error, Debug)]
pub enum PackError {
    /// The base directory does not exist or is not a directory.
    #[error("Base directory not found: {}", .0.display())]
    BaseDirectory(PathBuf),

    /// The manifest could not be serialized.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Recursive directory walk failed.
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A selection rule's glob pattern is malformed.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as written in the rule.
        pattern: String,
        /// Parser error.
        source: glob::PatternError,
    },

    /// A rule without a target matched a file outside the base directory.
    #[error("Pattern '{pattern}' matched {} outside the base directory; give the rule a target", path.display())]
    OutsideBase {
        /// The pattern as written in the rule.
        pattern: String,
        /// The matched file.
        path: PathBuf,
    },

    /// A glob match could not be inspected.
    #[error("Glob match failed: {0}")]
    Glob(#[from] glob::GlobError),

    /// A selected file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A generated document could not be rendered.
    #[error("Document error: {0}")]
    Document(#[from] XmlError),

    /// The zip container rejected an entry or failed to finalize.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Two entries resolved to the same internal path.
    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// An entry was stored after the archive was finalized.
    #[error("Archive already finalized")]
    Finalized,

    /// The finished package could not be written to disk.
    #[error("Failed to write package {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Coarse classification of a [`PackError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackStage {
    /// Invalid input before any file was selected.
    Input,
    /// Walking, globbing or reading source files.
    Selection,
    /// Rendering the manifest or a generated document.
    Serialization,
    /// Storing entries in the container or writing it out.
    Writer,
}

impl std::fmt::Display for PackStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Selection => "selection",
            Self::Serialization => "serialization",
            Self::Writer => "writer",
        })
    }
}

impl PackError {
    /// The stage of the build that failed.
    pub fn stage(&self) -> PackStage {
        match self {
            Self::BaseDirectory(_) | Self::Pattern { .. } | Self::OutsideBase { .. } => {
                PackStage::Input
            }
            Self::Walk(_) | Self::Glob(_) | Self::Read { .. } => PackStage::Selection,
            Self::Manifest(_) | Self::Document(_) => PackStage::Serialization,
            Self::Archive(_) | Self::DuplicateEntry(_) | Self::Finalized | Self::Write { .. } => {
                PackStage::Writer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_classification() {
        assert_eq!(
            PackError::BaseDirectory(PathBuf::from("/nope")).stage(),
            PackStage::Input
        );
        assert_eq!(
            PackError::Read {
                path: PathBuf::from("a.dll"),
                source: std::io::Error::other("boom"),
            }
            .stage(),
            PackStage::Selection
        );
        assert_eq!(
            PackError::Manifest(ManifestError::MissingField("id")).stage(),
            PackStage::Serialization
        );
        assert_eq!(
            PackError::DuplicateEntry("a.dll".to_string()).stage(),
            PackStage::Writer
        );
        assert_eq!(PackStage::Selection.to_string(), "selection");
    }

    #[test]
    fn test_pattern_error_message() {
        let source = glob::Pattern::new("lib/[").unwrap_err();
        let err = PackError::Pattern {
            pattern: "lib/[".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid glob pattern 'lib/['"));
    }
}
