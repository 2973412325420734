//! `nupack push`

use std::path::Path;

use anyhow::{Context, Result, bail};
use nupack_core::push::push_package;

/// Upload a built package and report the source's answer.
pub async fn push(package: &Path, source: Option<&str>, api_key: Option<&str>) -> Result<()> {
    let bytes = std::fs::read(package)
        .with_context(|| format!("Failed to read package {}", package.display()))?;

    let client = reqwest::Client::new();
    let source = source.unwrap_or_default();
    let outcome = push_package(&client, bytes, api_key, source)
        .await
        .with_context(|| format!("Failed to push {}", package.display()))?;

    println!(
        "{} {} in {}ms",
        source,
        outcome.status,
        outcome.elapsed.as_millis()
    );
    if !outcome.is_success() {
        bail!("Source rejected {} with {}", package.display(), outcome.status);
    }
    Ok(())
}
