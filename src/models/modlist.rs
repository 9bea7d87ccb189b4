use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::html::{self, DocumentParser};
use crate::models::mod_ref::ModReference;
use crate::utils::errors::InstallerError;

/// Every `<a href>` in the document becomes a reference, in document order.
pub fn parse_modlist(html: &str, parser: &dyn DocumentParser) -> Vec<ModReference> {
    let document = parser.parse_document(html);
    document
        .find_all("a", &[])
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.attr("href")?;
            Some(ModReference::new(&document.text(anchor), href))
        })
        .collect()
}

pub fn load_modlist(
    path: &Path,
    parser: &dyn DocumentParser,
) -> Result<Vec<ModReference>, InstallerError> {
    if !path.exists() {
        return Err(InstallerError::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_modlist(&content, parser))
}

/// Renders references as the same `<ul>` list markup a modlist export uses.
pub fn render_modlist(mods: &[ModReference]) -> String {
    let mut out = String::from("<ul>\n");
    for m in mods {
        out.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            html::escape(&m.url),
            html::escape(&m.label())
        ));
    }
    out.push_str("</ul>\n");
    out
}

pub fn write_modlist(path: &Path, mods: &[ModReference]) -> Result<()> {
    crate::utils::write_file(path, &render_modlist(mods))
}
