//! `.nuspec` manifest parsing, validation and serialization.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::manifest::{FileRule, Manifest, ManifestError};
use crate::xml::XmlDocument;

/// A parsed `.nuspec` document: package metadata plus file selection rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename = "package")]
pub struct NuSpec {
    /// The `<metadata>` section.
    pub metadata: Metadata,
    /// The `<files>` section; empty when absent.
    #[serde(default)]
    pub files: Files,
}

/// Package identity and publisher metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Package identifier (e.g. `Newtonsoft.Json`).
    #[serde(default)]
    pub id: String,
    /// Package version (e.g. `1.0.0`).
    #[serde(default)]
    pub version: String,
    /// Human-friendly title.
    #[serde(default)]
    pub title: Option<String>,
    /// Comma-separated author list.
    #[serde(default)]
    pub authors: String,
    /// Comma-separated owner list.
    #[serde(default)]
    pub owners: Option<String>,
    /// Project home page.
    #[serde(default)]
    pub project_url: Option<String>,
    /// Icon URL.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// License URL.
    #[serde(default)]
    pub license_url: Option<String>,
    /// Whether consumers must accept the license before install.
    #[serde(default)]
    pub require_license_acceptance: Option<bool>,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Notes for this release.
    #[serde(default)]
    pub release_notes: Option<String>,
    /// Copyright statement.
    #[serde(default)]
    pub copyright: Option<String>,
    /// Locale of the package (e.g. `en-US`).
    #[serde(default)]
    pub language: Option<String>,
    /// Space-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
}

/// The `<files>` section of a nuspec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Files {
    /// Selection rules in declaration order.
    #[serde(rename = "file", default)]
    pub file: Vec<FileRule>,
}

impl NuSpec {
    /// Create a manifest with the required identity fields and no file rules.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                id: id.into(),
                version: version.into(),
                ..Metadata::default()
            },
            files: Files::default(),
        }
    }

    /// Parse a nuspec from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Io` if the file cannot be read, or
    /// `ManifestError::Parse` if the XML does not match the nuspec schema.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a nuspec from an XML string.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(quick_xml::de::from_str(content)?)
    }

    /// Check that the fields required by package registries are present.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let required = [
            ("id", &self.metadata.id),
            ("version", &self.metadata.version),
            ("authors", &self.metadata.authors),
            ("description", &self.metadata.description),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ManifestError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Append a file selection rule.
    pub fn with_file(mut self, rule: FileRule) -> Self {
        self.files.file.push(rule);
        self
    }

    fn render(&self) -> Result<Vec<u8>, ManifestError> {
        let m = &self.metadata;
        let mut doc = XmlDocument::new()?;
        doc.start("package", &[("xmlns", crate::NUSPEC_NAMESPACE)])?;

        doc.start("metadata", &[])?;
        doc.text_element("id", &m.id)?;
        doc.text_element("version", &m.version)?;
        doc.optional_element("title", m.title.as_deref())?;
        doc.text_element("authors", &m.authors)?;
        doc.optional_element("owners", m.owners.as_deref())?;
        doc.optional_element("projectUrl", m.project_url.as_deref())?;
        doc.optional_element("iconUrl", m.icon_url.as_deref())?;
        doc.optional_element("licenseUrl", m.license_url.as_deref())?;
        if let Some(accept) = m.require_license_acceptance {
            doc.text_element("requireLicenseAcceptance", if accept { "true" } else { "false" })?;
        }
        doc.text_element("description", &m.description)?;
        doc.optional_element("summary", m.summary.as_deref())?;
        doc.optional_element("releaseNotes", m.release_notes.as_deref())?;
        doc.optional_element("copyright", m.copyright.as_deref())?;
        doc.optional_element("language", m.language.as_deref())?;
        doc.optional_element("tags", m.tags.as_deref())?;
        doc.end("metadata")?;

        if !self.files.file.is_empty() {
            doc.start("files", &[])?;
            for rule in &self.files.file {
                let mut attrs = vec![("src", rule.source.as_str())];
                if let Some(target) = &rule.target {
                    attrs.push(("target", target.as_str()));
                }
                if let Some(exclude) = &rule.exclude {
                    attrs.push(("exclude", exclude.as_str()));
                }
                doc.empty("file", &attrs)?;
            }
            doc.end("files")?;
        }

        doc.end("package")?;
        Ok(doc.into_bytes())
    }
}

impl std::str::FromStr for NuSpec {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Manifest for NuSpec {
    fn id(&self) -> &str {
        &self.metadata.id
    }

    fn version(&self) -> &str {
        &self.metadata.version
    }

    fn authors(&self) -> &str {
        &self.metadata.authors
    }

    fn description(&self) -> &str {
        &self.metadata.description
    }

    fn tags(&self) -> Option<&str> {
        self.metadata.tags.as_deref()
    }

    fn file_rules(&self) -> &[FileRule] {
        &self.files.file
    }

    fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        self.render()
    }
}
