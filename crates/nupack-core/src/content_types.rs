//! `[Content_Types].xml` generation.
//!
//! OPC consumers resolve every part's MIME type through this document, so
//! each extension present in the archive must be declared exactly once.
//! Extensions are compared case-insensitively, as OPC does.

use nupack_schema::XmlError;
use nupack_schema::xml::XmlDocument;

/// Archive path of the content-type declaration.
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

const NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Fallback for extensions without a known mapping.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type of the relationships index.
pub const RELATIONSHIPS_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// MIME type of the core-properties part.
pub const CORE_PROPERTIES_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";

const KNOWN_TYPES: &[(&str, &str)] = &[
    ("rels", RELATIONSHIPS_TYPE),
    ("psmdcp", CORE_PROPERTIES_TYPE),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("png", "image/png"),
];

/// Default MIME type for an extension (with or without its leading dot).
pub fn default_content_type(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.');
    KNOWN_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(OCTET_STREAM, |&(_, mime)| mime)
}

/// Accumulates the extensions seen while building an archive.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    manifest_extension: String,
    extensions: Vec<String>,
    overrides: Vec<String>,
}

impl ContentTypes {
    /// Create an empty registry for a package whose manifest uses
    /// `manifest_extension` (e.g. `.nuspec`).
    pub fn new(manifest_extension: &str) -> Self {
        Self {
            manifest_extension: normalize(manifest_extension),
            extensions: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Record an extension, leading dot included, spelling as given.
    ///
    /// Repeats (ignoring ASCII case) and empty extensions are ignored.
    pub fn add(&mut self, extension: &str) {
        let ext = normalize(extension);
        if ext.len() <= 1 || self.contains(&ext) {
            return;
        }
        self.extensions.push(ext);
    }

    /// Record an archive part by path: its extension when it has one,
    /// otherwise an explicit override for the part itself.
    pub fn add_part(&mut self, path: &str) {
        match part_extension(path) {
            Some(ext) => self.add(ext),
            None => {
                let part_name = format!("/{}", path.trim_start_matches('/'));
                if !self.overrides.contains(&part_name) {
                    self.overrides.push(part_name);
                }
            }
        }
    }

    /// Distinct extensions recorded so far, in first-seen order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn contains(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Render the declaration. The relationships and manifest extensions are
    /// always declared, since those parts are always written.
    pub fn render(&self) -> Result<Vec<u8>, XmlError> {
        let mut declared = self.clone();
        declared.add(".rels");
        declared.add(&self.manifest_extension);

        let mut doc = XmlDocument::new()?;
        doc.start("Types", &[("xmlns", NAMESPACE)])?;
        for ext in &declared.extensions {
            let bare = ext.trim_start_matches('.');
            doc.empty(
                "Default",
                &[
                    ("Extension", bare),
                    ("ContentType", default_content_type(bare)),
                ],
            )?;
        }
        for part in &declared.overrides {
            doc.empty(
                "Override",
                &[("PartName", part.as_str()), ("ContentType", OCTET_STREAM)],
            )?;
        }
        doc.end("Types")?;
        Ok(doc.into_bytes())
    }
}

/// Extension of the final path segment, including its dot.
///
/// Dot-files such as `.rels` count as extensions, matching OPC.
pub fn part_extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.')
        .map(|idx| &name[idx..])
        .filter(|ext| ext.len() > 1)
}

fn normalize(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}
