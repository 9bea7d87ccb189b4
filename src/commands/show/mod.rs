use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::html::TagScanner;
use crate::models::manifest::{Manifest, ManifestEntry};
use crate::models::mod_ref::ModReference;
use crate::models::modlist;
use crate::utils::center_pad;

const SYMBOL_LEN: usize = 10;
const PROJECT_ID_LEN: usize = 12;
const FILE_ID_LEN: usize = 9;

const NAME_LEN: usize = 22;
const AUTHOR_LEN: usize = 15;
const VERSION_LEN: usize = 10;
const FILES_LEN: usize = 5;

pub async fn run_modlist(path: &Path) -> Result<()> {
    println!("Parsing mods..");
    let mods = modlist::load_modlist(path, &TagScanner)
        .with_context(|| format!("Failed to load modlist: {}", path.display()))?;

    for m in &mods {
        println!("{}", format_mod(m));
    }
    println!("Mods found: {}", style(mods.len()).bold());
    Ok(())
}

pub async fn run_manifest(path: &Path) -> Result<()> {
    println!("Parsing manifest..");
    let manifest = Manifest::load(path)
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;

    if !manifest.files.is_empty() {
        println!("{}", format_manifest_files(&manifest.files));
    }
    println!("{}", manifest_table(&[&manifest]));
    Ok(())
}

/// `[name]  "author"  url`, padded into columns.
pub fn format_mod(m: &ModReference) -> String {
    format!(
        "{:<24} {:<12} {}",
        format!("[{}]", m.display_name),
        format!("\"{}\"", m.author),
        m.url
    )
}

pub fn format_manifest_files(files: &[ManifestEntry]) -> String {
    let mut out = String::new();
    out.push_str("| REQUIRED | PROJECT_ID | FILE_ID |\n");
    out.push_str(&"-".repeat(SYMBOL_LEN + PROJECT_ID_LEN + FILE_ID_LEN + 4));
    out.push('\n');
    for file in files {
        let symbol = if file.required { "[+]" } else { "[-]" };
        out.push_str(&format!(
            "|{}|{}|{}|\n",
            center_pad(symbol, SYMBOL_LEN),
            center_pad(&file.project_id.to_string(), PROJECT_ID_LEN),
            center_pad(&file.file_id.to_string(), FILE_ID_LEN)
        ));
    }
    let required = files.iter().filter(|f| f.required).count();
    out.push_str(&format!("Required mods: {}", required));
    out
}

/// Name, author, version and file count of each manifest, one row each.
pub fn manifest_table(manifests: &[&Manifest]) -> String {
    let line = "-".repeat(NAME_LEN + AUTHOR_LEN + VERSION_LEN + FILES_LEN + 5);
    let mut out = format!(
        "{line}\n|{}|{}|{}|{}|\n{line}\n",
        center_pad("NAME", NAME_LEN),
        center_pad("AUTHOR", AUTHOR_LEN),
        center_pad("VERSION", VERSION_LEN),
        center_pad("FILES", FILES_LEN)
    );
    for manifest in manifests {
        out.push_str(&format!(
            "|{}|{}|{}|{}|\n",
            center_pad(&manifest.name, NAME_LEN),
            center_pad(&manifest.author, AUTHOR_LEN),
            center_pad(&manifest.version, VERSION_LEN),
            center_pad(&manifest.files.len().to_string(), FILES_LEN)
        ));
    }
    out.push_str(&line);
    out
}
