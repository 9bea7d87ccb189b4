use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use modlist_installer::commands;
use modlist_installer::models::config::{InstallerConfig, ModLoader, CONFIG_FILENAME};

#[derive(Parser)]
#[command(name = "modlist-installer")]
#[command(author, version, about = "Resolves and downloads CurseForge modlists and manifests", long_about = None)]
struct Cli {
    /// Config file to read instead of ./modlist-installer.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the mods of a modlist export
    Show {
        #[arg(value_name = "MODLIST")]
        path: PathBuf,
    },
    /// Print the header and files of a manifest
    ShowManifest {
        #[arg(value_name = "MANIFEST")]
        path: PathBuf,
    },
    /// List an author's projects
    Author {
        name: String,
    },
    /// Resolve and download every mod of a modlist
    Install {
        #[arg(value_name = "MODLIST")]
        path: PathBuf,

        /// Minecraft version to download files for
        #[arg(long, short)]
        version: String,

        /// Mod loader to use (forge, fabric, quilt, neoforge)
        #[arg(long, short)]
        loader: Option<ModLoader>,
    },
    /// Download every file of a manifest
    InstallManifest {
        #[arg(value_name = "MANIFEST")]
        path: PathBuf,
    },
    /// Write the mods present in only one of two modlists
    Diff {
        first: PathBuf,
        second: PathBuf,
    },
    /// Write the files present in only one of two manifests
    DiffManifest {
        first: PathBuf,
        second: PathBuf,
    },
    /// Compare the mod jars of two directories
    DiffDir {
        first: PathBuf,
        second: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{}", style("[ERROR]").bold().red());
        eprintln!("{:?}", style(err).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let mut config = InstallerConfig::load(Path::new(&config_path))?;

    match cli.command {
        Commands::Show { path } => commands::show::run_modlist(&path).await,
        Commands::ShowManifest { path } => commands::show::run_manifest(&path).await,
        Commands::Author { name } => commands::author::run(&config, &name).await,
        Commands::Install {
            path,
            version,
            loader,
        } => {
            if let Some(loader) = loader {
                config.loader = loader;
            }
            commands::install::run(config, &path, &version).await.map(|_| ())
        }
        Commands::InstallManifest { path } => commands::manifest::run(config, &path).await.map(|_| ()),
        Commands::Diff { first, second } => commands::diff::run_modlists(&config, &first, &second)
            .await
            .map(|_| ()),
        Commands::DiffManifest { first, second } => {
            commands::diff::run_manifests(&config, &first, &second)
                .await
                .map(|_| ())
        }
        Commands::DiffDir { first, second } => commands::diff::run_directories(&first, &second).await.map(|_| ()),
    }
}
