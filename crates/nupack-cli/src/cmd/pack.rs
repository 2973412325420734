//! `nupack pack`

use std::path::Path;

use anyhow::{Context, Result};
use nupack_schema::{Manifest, NuSpec};
use tracing::debug;

/// Build `<id>.<version>.nupkg` from a nuspec and write it to `output_dir`.
pub fn pack(nuspec: &Path, base_path: Option<&Path>, output_dir: &Path) -> Result<()> {
    let manifest = NuSpec::from_file(nuspec)
        .with_context(|| format!("Failed to load manifest {}", nuspec.display()))?;
    manifest
        .validate()
        .with_context(|| format!("Invalid manifest {}", nuspec.display()))?;

    let base = base_path
        .or_else(|| nuspec.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    debug!(id = manifest.id(), base = %base.display(), "packing");

    let bytes = nupack_core::pack(&manifest, base).map_err(|e| {
        let context = format!(
            "Failed to pack {} {} ({} stage)",
            manifest.id(),
            manifest.version(),
            e.stage()
        );
        anyhow::Error::new(e).context(context)
    })?;
    let path = nupack_core::write_package(&manifest, &bytes, output_dir)
        .with_context(|| format!("Failed to write package to {}", output_dir.display()))?;

    println!("Created {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
