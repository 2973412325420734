//! Shared manifest types and XML wire format for nupack.
//!
//! The archive engine in `nupack-core` only sees the [`Manifest`] trait;
//! [`NuSpec`] is the concrete `.nuspec` model the CLI parses from disk.

pub mod manifest;
pub mod nuspec;
pub mod xml;

// Re-exports
pub use manifest::{FileRule, Manifest, ManifestError};
pub use nuspec::{Metadata, NuSpec};
pub use xml::XmlError;

/// File extension of the manifest document, without the leading dot.
pub const NUSPEC_EXTENSION: &str = "nuspec";

/// XML namespace written on the root `<package>` element of a nuspec.
pub const NUSPEC_NAMESPACE: &str = "http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd";
