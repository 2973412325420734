//! The `_rels/.rels` relationships index.

use nupack_schema::XmlError;
use nupack_schema::xml::XmlDocument;
use rand::Rng;

/// Archive path of the package-level relationships index.
pub const RELATIONSHIPS_PATH: &str = "_rels/.rels";

/// Relationship type linking the package root to its manifest.
pub const MANIFEST_RELATIONSHIP: &str = "http://schemas.microsoft.com/packaging/2010/07/manifest";

/// Relationship type linking the package root to its core properties.
pub const CORE_PROPERTIES_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

const NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship type URI.
    pub kind: String,
    /// Absolute part name of the target (`/`-prefixed).
    pub target: String,
    /// Unique id within the index.
    pub id: String,
}

/// Ordered list of package-level relationships.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relationship. `target` is made absolute when it is not.
    pub fn add<R: Rng + ?Sized>(&mut self, kind: &str, target: &str, rng: &mut R) {
        let target = if target.starts_with('/') {
            target.to_string()
        } else {
            format!("/{target}")
        };
        self.entries.push(Relationship {
            kind: kind.to_string(),
            target,
            id: format!("R{}", crate::random_hex(rng, 16)),
        });
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Relationship] {
        &self.entries
    }

    /// Render the index as XML.
    pub fn render(&self) -> Result<Vec<u8>, XmlError> {
        let mut doc = XmlDocument::new()?;
        doc.start("Relationships", &[("xmlns", NAMESPACE)])?;
        for rel in &self.entries {
            doc.empty(
                "Relationship",
                &[
                    ("Type", rel.kind.as_str()),
                    ("Target", rel.target.as_str()),
                    ("Id", rel.id.as_str()),
                ],
            )?;
        }
        doc.end("Relationships")?;
        Ok(doc.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_entries_keep_order_and_absolute_targets() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut rels = Relationships::new();
        rels.add(MANIFEST_RELATIONSHIP, "/Foo.nuspec", &mut rng);
        rels.add(
            CORE_PROPERTIES_RELATIONSHIP,
            "package/services/metadata/core-properties/abc.psmdcp",
            &mut rng,
        );

        let entries = rels.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, MANIFEST_RELATIONSHIP);
        assert_eq!(entries[0].target, "/Foo.nuspec");
        assert_eq!(
            entries[1].target,
            "/package/services/metadata/core-properties/abc.psmdcp"
        );
        assert_ne!(entries[0].id, entries[1].id);
        assert!(entries.iter().all(|r| r.id.len() == 17 && r.id.starts_with('R')));
    }

    #[test]
    fn test_render() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut rels = Relationships::new();
        rels.add(MANIFEST_RELATIONSHIP, "/Foo.nuspec", &mut rng);
        let id = rels.entries()[0].id.clone();

        let xml = String::from_utf8(rels.render().unwrap()).unwrap();
        assert!(xml.contains(NAMESPACE));
        assert!(xml.contains(&format!(
            r#"<Relationship Type="{MANIFEST_RELATIONSHIP}" Target="/Foo.nuspec" Id="{id}"/>"#
        )));
    }
}
