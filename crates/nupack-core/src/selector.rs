//! Resolves which source files enter the archive and under which path.
//!
//! Two modes share one output shape:
//!
//! - [`SelectionMode::AllFiles`]: every regular file under the base
//!   directory, at its base-relative path.
//! - [`SelectionMode::Globs`]: the matches of each [`FileRule`] in
//!   declaration order, optionally flattened into the rule's target.
//!
//! In both modes a file named like the manifest document is skipped, since
//! the orchestrator writes the manifest itself. Symlinked files are followed
//! in both modes.
//!
//! A rule may reach outside the base directory (`../bin/*.dll`) only when it
//! has a target; without one the match has no in-package path and the rule
//! fails with [`PackError::OutsideBase`].

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use nupack_schema::FileRule;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::PackError;

/// How content files are chosen.
#[derive(Debug, Clone, Copy)]
pub enum SelectionMode<'a> {
    /// Include everything under the base directory.
    AllFiles,
    /// Include only matches of these rules.
    Globs(&'a [FileRule]),
}

impl<'a> SelectionMode<'a> {
    /// `AllFiles` when there are no rules, `Globs` otherwise.
    pub fn from_rules(rules: &'a [FileRule]) -> Self {
        if rules.is_empty() {
            Self::AllFiles
        } else {
            Self::Globs(rules)
        }
    }
}

/// A file chosen for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Forward-slash path inside the archive.
    pub path: String,
    /// File contents.
    pub content: Vec<u8>,
}

const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Select the content files for a package.
///
/// `manifest_file_name` is the base name of the manifest document
/// (`<id>.nuspec`); files with that name are never selected.
///
/// # Errors
///
/// Fails on a missing base directory, a malformed pattern, or any walk,
/// glob or read error. Nothing is returned on failure.
pub fn select(
    base: &Path,
    mode: SelectionMode<'_>,
    manifest_file_name: &str,
) -> Result<Vec<SelectedFile>, PackError> {
    let base = base
        .canonicalize()
        .ok()
        .filter(|p| p.is_dir())
        .ok_or_else(|| PackError::BaseDirectory(base.to_path_buf()))?;

    match mode {
        SelectionMode::AllFiles => select_all(&base, manifest_file_name),
        SelectionMode::Globs(rules) => {
            let mut files = Vec::new();
            for rule in rules {
                select_rule(&base, rule, manifest_file_name, &mut files)?;
            }
            Ok(files)
        }
    }
}

fn select_all(base: &Path, manifest_file_name: &str) -> Result<Vec<SelectedFile>, PackError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(base).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() == OsStr::new(manifest_file_name) {
            continue;
        }
        let path = archive_path(entry.path().strip_prefix(base).unwrap_or(entry.path()));
        files.push(read_selected(entry.path(), path)?);
    }
    debug!(base = %base.display(), count = files.len(), "selected all files");
    Ok(files)
}

fn select_rule(
    base: &Path,
    rule: &FileRule,
    manifest_file_name: &str,
    files: &mut Vec<SelectedFile>,
) -> Result<(), PackError> {
    let source = rule.source.replace('\\', "/");
    let escaped_base = PathBuf::from(Pattern::escape(&base.to_string_lossy()));
    let pattern = escaped_base.join(source.trim_start_matches('/'));

    let excludes = rule
        .exclude_patterns()
        .map(|p| {
            Pattern::new(&p.replace('\\', "/")).map_err(|source| PackError::Pattern {
                pattern: p.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let matches =
        glob::glob(&pattern.to_string_lossy()).map_err(|source| PackError::Pattern {
            pattern: rule.source.clone(),
            source,
        })?;

    let before = files.len();
    for matched in matches {
        let matched = matched?;
        let Some(name) = matched.file_name() else {
            continue;
        };
        if !matched.is_file() || name == OsStr::new(manifest_file_name) {
            continue;
        }

        let relative = matched.strip_prefix(base).unwrap_or(&matched);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if excludes
            .iter()
            .any(|p| p.matches_with(&relative_str, EXCLUDE_OPTIONS))
        {
            trace!(path = %relative_str, "excluded");
            continue;
        }

        let path = match &rule.target {
            Some(target) => target_path(target, &name.to_string_lossy()),
            None if inside => archive_path(relative),
            None => {
                return Err(PackError::OutsideBase {
                    pattern: rule.source.clone(),
                    path: matched.clone(),
                });
            }
        };
        files.push(read_selected(&matched, path)?);
    }

    debug!(
        source = %rule.source,
        target = rule.target.as_deref().unwrap_or(""),
        count = files.len() - before,
        "applied file rule"
    );
    Ok(())
}

fn read_selected(disk_path: &Path, path: String) -> Result<SelectedFile, PackError> {
    let content = std::fs::read(disk_path).map_err(|source| PackError::Read {
        path: disk_path.to_path_buf(),
        source,
    })?;
    trace!(path = %path, bytes = content.len(), "selected");
    Ok(SelectedFile { path, content })
}

/// Join the normal components of `relative` with `/`.
pub fn archive_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn target_path(target: &str, file_name: &str) -> String {
    let target = target.replace('\\', "/");
    let target = target.trim_matches('/');
    if target.is_empty() {
        file_name.to_string()
    } else {
        format!("{target}/{file_name}")
    }
}
