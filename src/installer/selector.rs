use tracing::{debug, info};

use crate::api::curseforge::schema::ModFile;
use crate::api::curseforge::CurseforgeClient;
use crate::installer::version::VersionContext;
use crate::utils::errors::InstallerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_id: u32,
    pub file_name: String,
    pub file_length: u64,
}

/// Outcome of looking up the release file of a project. Every lookup ends in
/// exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    Success(FileInfo),
    /// No file for the target version (nor its base version).
    NotFound,
    /// The files request never got a response.
    TimedOut,
    /// The newest file is missing its id, name or length.
    Unknown,
}

impl FileSelection {
    /// Message recorded for a failed mod.
    pub fn failure_reason(&self) -> Option<&'static str> {
        match self {
            FileSelection::Success(_) => None,
            FileSelection::NotFound => Some("no file for this version"),
            FileSelection::TimedOut => Some("files request timed out"),
            FileSelection::Unknown => Some("unexpected files response"),
        }
    }
}

pub struct FileSelector<'a> {
    client: &'a CurseforgeClient,
}

impl<'a> FileSelector<'a> {
    pub fn new(client: &'a CurseforgeClient) -> Self {
        Self { client }
    }

    /// Picks the newest file of `project_id` for the context's version,
    /// retrying once against the base version when there is none.
    pub async fn select_file(&self, project_id: u32, ctx: &VersionContext) -> FileSelection {
        match self.query(project_id, ctx.version_id).await {
            Ok(files) if files.is_empty() && ctx.has_fallback() => {
                info!(
                    "No files of project {} for {}, retrying with base version id {}",
                    project_id, ctx.target_version, ctx.base_version_id
                );
                match self.query(project_id, ctx.base_version_id).await {
                    Ok(files) => pick_newest(&files),
                    Err(selection) => selection,
                }
            }
            Ok(files) => pick_newest(&files),
            Err(selection) => selection,
        }
    }

    async fn query(&self, project_id: u32, game_version_id: u32) -> Result<Vec<ModFile>, FileSelection> {
        match self.client.get_mod_files(project_id, game_version_id).await {
            Ok(Some(files)) => Ok(files),
            Ok(None) => Err(FileSelection::NotFound),
            Err(InstallerError::RequestError(e)) => {
                debug!("Files request for project {} failed: {}", project_id, e);
                Err(FileSelection::TimedOut)
            }
            Err(e) => {
                debug!("Files request for project {} could not be made: {}", project_id, e);
                Err(FileSelection::Unknown)
            }
        }
    }
}

/// The endpoint sorts newest first, so the first entry is the one to use.
fn pick_newest(files: &[ModFile]) -> FileSelection {
    let Some(newest) = files.first() else {
        return FileSelection::NotFound;
    };
    match (newest.id, &newest.file_name, newest.file_length) {
        (Some(file_id), Some(file_name), Some(file_length)) => FileSelection::Success(FileInfo {
            file_id,
            file_name: file_name.clone(),
            file_length,
        }),
        _ => FileSelection::Unknown,
    }
}
