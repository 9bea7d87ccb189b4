pub mod errors;

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub fn ensure_dir_exists(dir_path: &Path) -> Result<()> {
    if !dir_path.exists() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    Ok(())
}

/// Overwrites `path` with `contents`, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;
    Ok(())
}

/// Pads `text` on both sides so it is centered in a column of `width` characters.
pub fn center_pad(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

/// Makes a manifest name usable as a single directory name. Names made of
/// dots only (`.`, `..`) come back empty.
pub fn sanitize_dir_name(name: &str) -> String {
    let name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>();
    let name = name.trim();
    if name.chars().all(|c| c == '.') {
        return String::new();
    }
    name.to_string()
}
