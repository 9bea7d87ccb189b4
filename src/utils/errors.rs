use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("Minecraft version {0} does not exist in the CurseForge version catalog")]
    VersionNotFound(String),

    #[error("Failed to access CurseForge API: {0}")]
    CurseforgeApiError(String),

    #[error("Invalid mod loader: {0}. Expected one of forge, fabric, quilt, neoforge")]
    InvalidModLoader(String),

    #[error("Failed to download mod: {0}")]
    ModDownloadError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Invalid configuration value for {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
}
