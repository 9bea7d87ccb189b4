pub mod schema;

use reqwest::header::HeaderValue;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use crate::api::http::{endpoint, HttpContext};
use crate::models::config::Endpoints;
use crate::utils::errors::InstallerError;
use schema::{GameVersion, GetGameVersionsResponse, GetModFilesRequestQuery, GetModFilesResponse, ModFile};

/// Client for the two CurseForge surfaces the installer talks to: the core
/// API (version catalog, needs a key) and the website API (file listings and
/// downloads).
#[derive(Debug, Clone)]
pub struct CurseforgeClient {
    http: HttpContext,
    api_url: String,
    site_url: String,
    api_key: Option<String>,
}

/// A file written by [`CurseforgeClient::download_file`].
#[derive(Debug, Clone)]
pub struct DownloadInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

impl CurseforgeClient {
    pub fn new(http: HttpContext, endpoints: &Endpoints, api_key: Option<String>) -> Self {
        Self {
            http,
            api_url: endpoints.curseforge_api.clone(),
            site_url: endpoints.curseforge_site.clone(),
            api_key,
        }
    }

    pub async fn get_game_versions(&self) -> Result<Vec<GameVersion>, InstallerError> {
        let url = endpoint(&self.api_url, &["minecraft", "version"])?;

        let mut request = self.http.get_json(url);
        if let Some(key) = &self.api_key {
            let key = HeaderValue::from_str(key)
                .map_err(|e| InstallerError::InvalidConfig(format!("api key: {e}")))?;
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(InstallerError::CurseforgeApiError(format!(
                "version catalog request failed with status: {}",
                response.status()
            )));
        }

        let result: GetGameVersionsResponse = response.json().await?;
        Ok(result.data)
    }

    /// Lists the newest files of `project_id` for one game version.
    ///
    /// `Err` means the request never produced a response. `Ok(None)` means
    /// the server answered with an error status or with a body that has no
    /// file array.
    pub async fn get_mod_files(
        &self,
        project_id: u32,
        game_version_id: u32,
    ) -> Result<Option<Vec<ModFile>>, InstallerError> {
        let url = endpoint(&self.site_url, &["mods", &project_id.to_string(), "files"])?;
        let query = GetModFilesRequestQuery::latest_for_version(game_version_id);

        let response = self.http.get_json(url).query(&query).send().await?;
        if !response.status().is_success() {
            debug!(
                "Files request for project {} failed with status: {}",
                project_id,
                response.status()
            );
            return Ok(None);
        }

        let body = response.text().await?;
        match serde_json::from_str::<GetModFilesResponse>(&body) {
            Ok(files) => Ok(files.data),
            Err(e) => {
                debug!("Unparsable files response for project {}: {}", project_id, e);
                Ok(None)
            }
        }
    }

    pub fn download_url(&self, project_id: u32, file_id: u32) -> Result<Url, InstallerError> {
        endpoint(
            &self.site_url,
            &["mods", &project_id.to_string(), "files", &file_id.to_string(), "download"],
        )
    }

    /// Streams a file into `dir`, naming it after the last path segment of
    /// the URL the download finally resolved to.
    pub async fn download_file(
        &self,
        project_id: u32,
        file_id: u32,
        dir: &Path,
    ) -> Result<DownloadInfo, InstallerError> {
        let url = self.download_url(project_id, file_id)?;
        let mut response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(InstallerError::ModDownloadError(format!(
                "{} responded with status: {}",
                url,
                response.status()
            )));
        }

        let file_name = resolved_file_name(response.url())
            .unwrap_or_else(|| format!("{}.jar", file_id));
        let path = dir.join(&file_name);

        let mut file = File::create(&path).await?;
        let mut bytes = 0u64;
        let written = async {
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
                bytes += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<(), InstallerError>(())
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(remove) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove partial download {}: {}", path.display(), remove);
            }
            return Err(e);
        }

        Ok(DownloadInfo {
            file_name,
            path,
            bytes,
        })
    }
}

/// Last path segment of `url`, percent-decoded. `None` when it is not usable
/// as a plain file name.
fn resolved_file_name(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let name = urlencoding::decode(segment).ok()?;
    if name == "download" || name.contains(['/', '\\', ':']) || name.starts_with('.') {
        return None;
    }
    Some(name.into_owned())
}
