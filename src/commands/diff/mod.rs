use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use walkdir::WalkDir;

use crate::commands::show::manifest_table;
use crate::html::TagScanner;
use crate::installer::diff::{compare_jars, diff_manifests, diff_modlists, Jar, JarMismatch};
use crate::models::config::InstallerConfig;
use crate::models::manifest::Manifest;
use crate::models::modlist;
use crate::utils;
use crate::utils::errors::InstallerError;

const JAR_COLUMN_WIDTH: usize = 50;

/// Writes the mods present in exactly one of the two modlists, compared by
/// name. Returns the number of differences.
pub async fn run_modlists(config: &InstallerConfig, first: &Path, second: &Path) -> Result<usize> {
    let mods1 = modlist::load_modlist(first, &TagScanner)
        .with_context(|| format!("Failed to load modlist: {}", first.display()))?;
    let mods2 = modlist::load_modlist(second, &TagScanner)
        .with_context(|| format!("Failed to load modlist: {}", second.display()))?;

    println!("Compared by name {} mods with {}", mods1.len(), mods2.len());
    let diff = diff_modlists(&mods1, &mods2);
    if diff.is_empty() {
        println!("{}", style("No differences found!").green());
        return Ok(0);
    }

    modlist::write_modlist(&config.diff_modlist_path, &diff)?;
    println!(
        "{} differences found, written to {}",
        style(diff.len()).bold(),
        config.diff_modlist_path.display()
    );
    Ok(diff.len())
}

/// Writes the files present in exactly one of the two manifests, compared by
/// file id. Returns the number of differences.
pub async fn run_manifests(config: &InstallerConfig, first: &Path, second: &Path) -> Result<usize> {
    let manifest1 = Manifest::load(first)
        .with_context(|| format!("Failed to load manifest: {}", first.display()))?;
    let manifest2 = Manifest::load(second)
        .with_context(|| format!("Failed to load manifest: {}", second.display()))?;

    println!("{}", manifest_table(&[&manifest1, &manifest2]));
    let files = diff_manifests(&manifest1.files, &manifest2.files);
    if files.is_empty() {
        println!("{}", style("No differences found!").green());
        return Ok(0);
    }

    let count = files.len();
    manifest1
        .derive("difference", files)
        .save(&config.diff_manifest_path)?;
    println!(
        "{} differences found, written to {}",
        style(count).bold(),
        config.diff_manifest_path.display()
    );
    Ok(count)
}

/// Prints the jars of `first` that have no identical jar in `second`, next to
/// the closest jar of `second` or `MISSING`. Returns the number of rows.
pub async fn run_directories(first: &Path, second: &Path) -> Result<usize> {
    let jars1 = load_jars(first)?;
    let jars2 = load_jars(second)?;

    println!("Compared {} jars with {}", jars1.len(), jars2.len());
    let mismatches = compare_jars(&jars1, &jars2);
    if mismatches.is_empty() {
        println!("{}", style("No differences found!").green());
        return Ok(0);
    }

    for mismatch in &mismatches {
        println!("{}", jar_row(mismatch));
    }
    println!("{} differences found", style(mismatches.len()).bold());
    Ok(mismatches.len())
}

fn jar_row(mismatch: &JarMismatch) -> String {
    let other = match &mismatch.candidate {
        Some(jar) => jar.label(),
        None => "MISSING".to_string(),
    };
    format!(
        "|{}|{}|",
        utils::center_pad(&mismatch.jar.label(), JAR_COLUMN_WIDTH),
        utils::center_pad(&other, JAR_COLUMN_WIDTH)
    )
}

/// Jars directly inside `dir`, sorted by file name.
fn load_jars(dir: &Path) -> Result<Vec<Jar>> {
    if !dir.is_dir() {
        return Err(InstallerError::FileNotFound(dir.display().to_string()).into());
    }

    let mut jars = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.to_lowercase().ends_with(".jar") {
            jars.push(Jar::parse(&name));
        }
    }
    Ok(jars)
}
