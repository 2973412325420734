//! The `.psmdcp` core-properties part.

use nupack_schema::xml::XmlDocument;
use nupack_schema::{Manifest, XmlError};
use rand::Rng;

/// Directory holding the core-properties part.
pub const CORE_PROPERTIES_DIR: &str = "package/services/metadata/core-properties";

/// Number of random hex characters in the part's file name.
pub const PART_NAME_LEN: usize = 32;

const NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
const DCTERMS_NAMESPACE: &str = "http://purl.org/dc/terms/";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Publisher metadata mirrored from the manifest into the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProperties {
    /// Package authors.
    pub creator: String,
    /// Package description.
    pub description: String,
    /// Package identifier.
    pub identifier: String,
    /// Package version.
    pub version: String,
    /// Space-separated tags.
    pub keywords: String,
    /// Tool that produced the package.
    pub last_modified_by: String,
}

impl CoreProperties {
    /// Derive the core properties from a manifest, stamped with this tool's
    /// generator tag.
    pub fn from_manifest<M: Manifest + ?Sized>(manifest: &M) -> Self {
        Self {
            creator: manifest.authors().to_string(),
            description: manifest.description().to_string(),
            identifier: manifest.id().to_string(),
            version: manifest.version().to_string(),
            keywords: manifest.tags().unwrap_or_default().to_string(),
            last_modified_by: crate::USER_AGENT.to_string(),
        }
    }

    /// A fresh randomized archive path for the part:
    /// `package/services/metadata/core-properties/<32 hex>.psmdcp`.
    pub fn part_name<R: Rng + ?Sized>(rng: &mut R) -> String {
        format!(
            "{CORE_PROPERTIES_DIR}/{}.psmdcp",
            crate::random_hex(rng, PART_NAME_LEN)
        )
    }

    /// Render the part as XML.
    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut doc = XmlDocument::new()?;
        doc.start(
            "coreProperties",
            &[
                ("xmlns:dc", DC_NAMESPACE),
                ("xmlns:dcterms", DCTERMS_NAMESPACE),
                ("xmlns:xsi", XSI_NAMESPACE),
                ("xmlns", NAMESPACE),
            ],
        )?;
        doc.text_element("dc:creator", &self.creator)?;
        doc.text_element("dc:description", &self.description)?;
        doc.text_element("dc:identifier", &self.identifier)?;
        doc.text_element("version", &self.version)?;
        doc.text_element("keywords", &self.keywords)?;
        doc.text_element("lastModifiedBy", &self.last_modified_by)?;
        doc.end("coreProperties")?;
        Ok(doc.into_bytes())
    }
}
