use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::html::TagScanner;
use crate::installer::{InstallSummary, Installer};
use crate::models::config::InstallerConfig;
use crate::models::modlist;

/// Resolves and downloads every mod of the modlist at `path`.
pub async fn run(config: InstallerConfig, path: &Path, version: &str) -> Result<InstallSummary> {
    let mods = modlist::load_modlist(path, &TagScanner)
        .with_context(|| format!("Failed to load modlist: {}", path.display()))?;
    if mods.is_empty() {
        println!("{}", style("No mods found in modlist").yellow());
        return Ok(InstallSummary::default());
    }
    println!("📦 Mods parsed: {}", mods.len());

    let installer = Installer::new(config)?;
    let summary = installer.install_modlist(mods, version).await?;
    print_summary(&summary);
    Ok(summary)
}

pub fn print_summary(summary: &InstallSummary) {
    println!(
        "✅ Downloaded {}/{} mods",
        style(summary.downloaded).green().bold(),
        summary.processed
    );
    if summary.failed > 0 {
        println!(
            "{} {} failed, written to {}",
            style("⚠").yellow(),
            style(summary.failed).red().bold(),
            summary.failed_path.display()
        );
    }
}
