use anyhow::{Context, Result};
use std::path::Path;

use crate::commands::install::print_summary;
use crate::commands::show::format_manifest_files;
use crate::installer::{InstallSummary, Installer};
use crate::models::config::InstallerConfig;
use crate::models::manifest::Manifest;

/// Downloads every file listed in the manifest at `path`. No resolution is
/// needed since manifests carry project and file ids.
pub async fn run(config: InstallerConfig, path: &Path) -> Result<InstallSummary> {
    let manifest = Manifest::load(path)
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
    println!("📦 {} files in manifest '{}'", manifest.files.len(), manifest.name);

    let installer = Installer::new(config)?;
    let summary = installer.install_manifest(&manifest).await?;

    if summary.failed > 0 {
        let failed = Manifest::load(&summary.failed_path)?;
        println!("FAILED:");
        println!("{}", format_manifest_files(&failed.files));
    }
    print_summary(&summary);
    Ok(summary)
}
