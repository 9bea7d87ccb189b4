use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::utils::errors::InstallerError;

pub const CONFIG_FILENAME: &str = "modlist-installer.json";
const API_KEY_FILE_NAME: &str = ".modlist-installer-config";

/// Settings for one run of the installer. Every field has a default so a
/// partial `modlist-installer.json` is enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub loader: ModLoader,
    pub download_dir: PathBuf,
    pub cache_path: PathBuf,
    pub failed_modlist_path: PathBuf,
    pub failed_manifest_path: PathBuf,
    pub diff_modlist_path: PathBuf,
    pub diff_manifest_path: PathBuf,
    /// Upper bound on references processed by a single install run.
    pub max_items: usize,
    pub http: HttpSettings,
    pub endpoints: Endpoints,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            loader: ModLoader::Forge,
            download_dir: PathBuf::from("mods"),
            cache_path: PathBuf::from("mod.cache"),
            failed_modlist_path: PathBuf::from("failed.html"),
            failed_manifest_path: PathBuf::from("failed.json"),
            diff_modlist_path: PathBuf::from("diff.html"),
            diff_manifest_path: PathBuf::from("diff.json"),
            max_items: 5000,
            http: HttpSettings::default(),
            endpoints: Endpoints::default(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Value of the `__cf_bm` cookie sent along with search requests.
    pub cf_bm_token: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 6,
            user_agent: "Mozilla/5.0 Gecko/20100101".to_string(),
            accept_language: "en-US;q=0.7".to_string(),
            cf_bm_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// CurseForge core API, used for the game version catalog.
    pub curseforge_api: String,
    /// CurseForge website API, used for file listings and downloads.
    pub curseforge_site: String,
    pub cfwidget: String,
    pub search: String,
    /// Domain the search query is restricted to.
    pub search_site: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            curseforge_api: "https://api.curseforge.com/v1".to_string(),
            curseforge_site: "https://www.curseforge.com/api/v1".to_string(),
            cfwidget: "https://api.cfwidget.com".to_string(),
            search: "https://html.duckduckgo.com/html".to_string(),
            search_site: "curseforge.com".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModLoader {
    #[serde(rename = "forge")]
    Forge,
    #[serde(rename = "fabric")]
    Fabric,
    #[serde(rename = "quilt")]
    Quilt,
    #[serde(rename = "neoforge")]
    NeoForge,
}

impl ModLoader {
    pub const ALL: [ModLoader; 4] = [
        ModLoader::Forge,
        ModLoader::Fabric,
        ModLoader::Quilt,
        ModLoader::NeoForge,
    ];
}

impl std::fmt::Display for ModLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forge => write!(f, "forge"),
            Self::Fabric => write!(f, "fabric"),
            Self::Quilt => write!(f, "quilt"),
            Self::NeoForge => write!(f, "neoforge"),
        }
    }
}

impl FromStr for ModLoader {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModLoader::ALL
            .into_iter()
            .find(|loader| loader.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InstallerError::InvalidModLoader(s.to_string()))
    }
}

impl InstallerConfig {
    /// Reads `path` when it exists, falls back to defaults otherwise, then
    /// applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            InstallerConfig::default()
        };

        if let Ok(token) = env::var("CF_BM_TOKEN") {
            config.http.cf_bm_token = Some(token);
        }
        config.api_key = get_api_key()?;
        Ok(config)
    }
}

fn get_api_key() -> Result<Option<String>> {
    // First try environment variable
    if let Ok(key) = env::var("CURSEFORGE_API_KEY") {
        return Ok(Some(key));
    }

    // Then try config file in home directory
    if let Some(mut home_dir) = dirs::home_dir() {
        home_dir.push(API_KEY_FILE_NAME);
        if home_dir.exists() {
            let content = fs::read_to_string(&home_dir)
                .with_context(|| format!("Failed to read {}", home_dir.display()))?;
            for line in content.lines() {
                if let Some(key) = line.strip_prefix("api_key=") {
                    return Ok(Some(key.trim().to_string()));
                }
            }
        }
    }

    warn!(
        "CurseForge API key not found. Set CURSEFORGE_API_KEY or add api_key=YOUR_KEY to ~/{API_KEY_FILE_NAME}"
    );
    Ok(None)
}
