use serde::{Deserialize, Serialize};

/// Response from GET /v1/minecraft/version
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GetGameVersionsResponse {
    pub data: Vec<GameVersion>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameVersion {
    #[serde(rename = "versionString")]
    pub version_string: String,
    #[serde(rename = "gameVersionId")]
    pub game_version_id: u32,
}

/// Response from the website's GET /mods/{modId}/files. `data` is optional so
/// a missing array can be told apart from an empty one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GetModFilesResponse {
    #[serde(default)]
    pub data: Option<Vec<ModFile>>,
}

/// File entry as listed by the website API. Fields are optional because a
/// response missing them is classified rather than rejected.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ModFile {
    pub id: Option<u32>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileLength")]
    pub file_length: Option<u64>,
    #[serde(rename = "dateCreated")]
    pub date_created: Option<String>,
}

/// Query parameters for GET /mods/{modId}/files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GetModFilesRequestQuery {
    #[serde(rename = "pageIndex")]
    pub page_index: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub sort: String,
    #[serde(rename = "sortDescending")]
    pub sort_descending: bool,
    #[serde(rename = "removeAlphas")]
    pub remove_alphas: bool,
    #[serde(rename = "gameVersionId")]
    pub game_version_id: u32,
}

impl GetModFilesRequestQuery {
    /// Newest non-alpha files first, for a single game version.
    pub fn latest_for_version(game_version_id: u32) -> Self {
        Self {
            page_index: 0,
            page_size: 20,
            sort: "dateCreated".to_string(),
            sort_descending: true,
            remove_alphas: true,
            game_version_id,
        }
    }
}
