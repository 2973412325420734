//! Package assembly: manifest, content files and generated OPC parts into one
//! archive.

use std::io::Write;
use std::path::{Path, PathBuf};

use nupack_schema::Manifest;
use rand::Rng;
use tracing::{debug, info};

use crate::archive::ArchiveWriter;
use crate::content_types::{CONTENT_TYPES_PATH, ContentTypes};
use crate::core_properties::CoreProperties;
use crate::error::PackError;
use crate::relationships::{
    CORE_PROPERTIES_RELATIONSHIP, MANIFEST_RELATIONSHIP, RELATIONSHIPS_PATH, Relationships,
};
use crate::selector::{self, SelectionMode};

/// Build a package from `manifest`, selecting content under `base`.
///
/// Randomized part names come from the thread-local generator, so two builds
/// of the same input differ in the metadata part's path.
///
/// # Errors
///
/// Any [`PackError`]; no partial archive is returned.
pub fn pack<M: Manifest + ?Sized>(manifest: &M, base: &Path) -> Result<Vec<u8>, PackError> {
    pack_with_rng(manifest, base, &mut rand::rng())
}

/// [`pack`] with an explicit random source.
pub fn pack_with_rng<M, R>(manifest: &M, base: &Path, rng: &mut R) -> Result<Vec<u8>, PackError>
where
    M: Manifest + ?Sized,
    R: Rng + ?Sized,
{
    let manifest_name = manifest.file_name();
    let mut archive = ArchiveWriter::new();
    let mut content_types = ContentTypes::new(manifest.extension());

    archive.store(&manifest_name, &manifest.to_bytes()?)?;
    content_types.add_part(&manifest_name);
    debug!(entry = %manifest_name, "stored manifest");

    let mode = SelectionMode::from_rules(manifest.file_rules());
    let files = selector::select(base, mode, &manifest_name)?;
    for file in &files {
        archive.store(&file.path, &file.content)?;
        content_types.add_part(&file.path);
    }
    debug!(count = files.len(), "stored content files");

    let properties_path = CoreProperties::part_name(rng);
    archive.store(
        &properties_path,
        &CoreProperties::from_manifest(manifest).to_bytes()?,
    )?;
    content_types.add_part(&properties_path);
    debug!(entry = %properties_path, "stored core properties");

    let mut relationships = Relationships::new();
    relationships.add(MANIFEST_RELATIONSHIP, &manifest_name, rng);
    relationships.add(CORE_PROPERTIES_RELATIONSHIP, &properties_path, rng);
    archive.store(RELATIONSHIPS_PATH, &relationships.render()?)?;
    content_types.add_part(RELATIONSHIPS_PATH);

    archive.store(CONTENT_TYPES_PATH, &content_types.render()?)?;

    let entries = archive.len();
    let bytes = archive.into_bytes()?;
    info!(
        id = manifest.id(),
        version = manifest.version(),
        entries,
        bytes = bytes.len(),
        "packed"
    );
    Ok(bytes)
}

/// Conventional file name of a package: `<id>.<version>.nupkg`.
pub fn package_file_name<M: Manifest + ?Sized>(manifest: &M) -> String {
    format!("{}.{}.nupkg", manifest.id(), manifest.version())
}

/// Write `bytes` into `output_dir` under [`package_file_name`], creating the
/// directory when needed. The file appears atomically.
pub fn write_package<M: Manifest + ?Sized>(
    manifest: &M,
    bytes: &[u8],
    output_dir: &Path,
) -> Result<PathBuf, PackError> {
    let dest = output_dir.join(package_file_name(manifest));
    let write_err = |source| PackError::Write {
        path: dest.clone(),
        source,
    };

    std::fs::create_dir_all(output_dir).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(output_dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(&dest).map_err(|e| write_err(e.error))?;

    debug!(path = %dest.display(), bytes = bytes.len(), "wrote package");
    Ok(dest)
}
