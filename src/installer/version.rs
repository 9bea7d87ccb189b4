use tracing::{info, warn};

use crate::api::curseforge::schema::GameVersion;
use crate::api::curseforge::CurseforgeClient;
use crate::utils::errors::InstallerError;

/// The game version files are selected for, plus its "base" version
/// (`1.20.1` -> `1.20`) used as a fallback when a project has no file for the
/// exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionContext {
    pub target_version: String,
    pub version_id: u32,
    /// 0 when the base version is not in the catalog.
    pub base_version_id: u32,
}

impl VersionContext {
    /// Fetches the catalog and resolves `version` against it. An unknown
    /// version is fatal for the run.
    pub async fn resolve(client: &CurseforgeClient, version: &str) -> Result<Self, InstallerError> {
        let catalog = client.get_game_versions().await?;
        let context = Self::from_catalog(version, &catalog)
            .ok_or_else(|| InstallerError::VersionNotFound(version.to_string()))?;

        if context.base_version_id == 0 {
            warn!(
                "Base version {} is not in the catalog, version fallback disabled",
                base_version(version)
            );
        }
        info!(
            "Minecraft {} resolved to game version id {} (base id {})",
            version, context.version_id, context.base_version_id
        );
        Ok(context)
    }

    pub fn from_catalog(version: &str, catalog: &[GameVersion]) -> Option<Self> {
        let version = version.trim();
        let base = base_version(version);
        let id_of = |wanted: &str| {
            catalog
                .iter()
                .find(|v| v.version_string == wanted)
                .map(|v| v.game_version_id)
        };

        Some(Self {
            target_version: version.to_string(),
            version_id: id_of(version)?,
            base_version_id: id_of(base).unwrap_or(0),
        })
    }

    pub fn is_base_version(&self) -> bool {
        self.version_id == self.base_version_id
    }

    /// Whether a retry against the base version can return anything new.
    pub fn has_fallback(&self) -> bool {
        self.base_version_id != 0 && !self.is_base_version()
    }
}

/// Drops the last dot-separated component: `1.20.1` -> `1.20`. Versions
/// without a dot are their own base.
pub fn base_version(version: &str) -> &str {
    version.rsplit_once('.').map_or(version, |(base, _)| base)
}
