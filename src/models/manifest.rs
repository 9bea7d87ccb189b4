use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::utils::errors::InstallerError;

/// CurseForge modpack `manifest.json`. Only `files` matters to the installer;
/// the remaining fields are carried through when failed or diff manifests are
/// written back out.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minecraft: Option<ManifestMinecraft>,
    #[serde(rename = "manifestType", default = "default_manifest_type")]
    pub manifest_type: String,
    #[serde(rename = "manifestVersion", default = "default_manifest_version")]
    pub manifest_version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub files: Vec<ManifestEntry>,
    #[serde(default = "default_overrides")]
    pub overrides: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ManifestMinecraft {
    pub version: String,
    #[serde(rename = "modLoaders", default)]
    pub mod_loaders: Vec<ManifestModLoader>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ManifestModLoader {
    pub id: String,
    pub primary: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManifestEntry {
    #[serde(rename = "projectID")]
    pub project_id: u32,
    #[serde(rename = "fileID")]
    pub file_id: u32,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_manifest_type() -> String {
    "minecraftModpack".to_string()
}

fn default_manifest_version() -> u32 {
    1
}

fn default_overrides() -> String {
    "overrides".to_string()
}

fn default_required() -> bool {
    true
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, InstallerError> {
        if !path.exists() {
            return Err(InstallerError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            InstallerError::InvalidFileFormat(format!("{} is not a valid manifest: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        crate::utils::write_file(path, &content)
    }

    /// A manifest with this one's metadata but a different version label and
    /// file list, used for failed and diff outputs.
    pub fn derive(&self, version: &str, files: Vec<ManifestEntry>) -> Manifest {
        Manifest {
            version: version.to_string(),
            files,
            ..self.clone()
        }
    }

    pub fn required_count(&self) -> usize {
        self.files.iter().filter(|f| f.required).count()
    }
}
