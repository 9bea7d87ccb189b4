pub mod cache;
pub mod diff;
pub mod resolver;
pub mod selector;
pub mod version;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::api::cfwidget::CfWidgetClient;
use crate::api::curseforge::CurseforgeClient;
use crate::api::http::HttpContext;
use crate::api::search::SearchClient;
use crate::html::TagScanner;
use crate::models::config::InstallerConfig;
use crate::models::manifest::{Manifest, ManifestEntry};
use crate::models::mod_ref::ModReference;
use crate::models::modlist;
use crate::utils;

use cache::ModCache;
use resolver::IdentityResolver;
use selector::{FileSelection, FileSelector};
use version::VersionContext;

/// Counts reported at the end of an install run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    /// Items looked at, after the per-run cap.
    pub processed: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub failed_path: PathBuf,
}

/// Everything an install run needs, wired from one [`InstallerConfig`].
pub struct Installer {
    config: InstallerConfig,
    curseforge: CurseforgeClient,
    resolver: IdentityResolver,
}

impl Installer {
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let http = HttpContext::new(&config.http).context("Failed to initialize HTTP client")?;
        let endpoints = &config.endpoints;

        let curseforge = CurseforgeClient::new(http.clone(), endpoints, config.api_key.clone());
        let resolver = IdentityResolver::standard(
            CfWidgetClient::new(http.clone(), &endpoints.cfwidget),
            SearchClient::new(http, &endpoints.search, &endpoints.search_site),
            Box::new(TagScanner),
            config.loader,
        );

        Ok(Self {
            config,
            curseforge,
            resolver,
        })
    }

    /// Resolves and downloads every reference for `version`.
    ///
    /// Only an unknown version fails the run. Unresolved mods and failed
    /// lookups or downloads are collected into the failed modlist, and the
    /// cache is saved once at the end either way.
    pub async fn install_modlist(&self, mut mods: Vec<ModReference>, version: &str) -> Result<InstallSummary> {
        let ctx = VersionContext::resolve(&self.curseforge, version).await?;

        let mut cache = ModCache::load(&self.config.cache_path)?;
        info!("Loaded cache size: {}", cache.len());

        let download_dir = &self.config.download_dir;
        utils::ensure_dir_exists(download_dir)?;
        info!("Downloading to {}", download_dir.display());

        if mods.len() > self.config.max_items {
            warn!(
                "Modlist has {} entries, only the first {} are processed",
                mods.len(),
                self.config.max_items
            );
            mods.truncate(self.config.max_items);
        }

        let selector = FileSelector::new(&self.curseforge);
        let pb = progress_bar(mods.len())?;
        let mut downloaded = 0;
        let mut failed = Vec::new();

        for mut reference in mods.iter().cloned() {
            pb.set_message(reference.display_name.clone());
            pb.inc(1);

            let Some(project_id) = self.resolver.resolve(&reference, &cache).await else {
                warn!("Could not resolve a project id for {}", reference);
                failed.push(reference);
                continue;
            };
            reference.mark_resolved(project_id);
            if reference.explicit_id.is_none() {
                cache.put(reference.slug(), project_id);
            }

            let file = match selector.select_file(project_id, &ctx).await {
                FileSelection::Success(file) => file,
                other => {
                    warn!(
                        "{} (project {}): {}",
                        reference.display_name,
                        project_id,
                        other.failure_reason().unwrap_or_default()
                    );
                    failed.push(reference);
                    continue;
                }
            };

            if self.download(project_id, file.file_id, download_dir).await {
                downloaded += 1;
            } else {
                failed.push(reference);
            }
        }
        pb.finish_and_clear();

        persist_run(&cache, &self.config.failed_modlist_path, &failed)?;

        Ok(InstallSummary {
            processed: mods.len(),
            downloaded,
            failed: failed.len(),
            failed_path: self.config.failed_modlist_path.clone(),
        })
    }

    /// Downloads every manifest file into `<download_dir>/<manifest name>`.
    /// Failed entries go to the failed manifest with version `failed`.
    pub async fn install_manifest(&self, manifest: &Manifest) -> Result<InstallSummary> {
        let target_dir = self.manifest_dir(manifest);
        utils::ensure_dir_exists(&target_dir)?;
        info!("Downloading to {}", target_dir.display());

        let files: Vec<ManifestEntry> = manifest.files.iter().take(self.config.max_items).copied().collect();
        let pb = progress_bar(files.len())?;
        let mut downloaded = 0;
        let mut failed = Vec::new();

        for entry in &files {
            pb.set_message(format!("{}/{}", entry.project_id, entry.file_id));
            pb.inc(1);
            if self.download(entry.project_id, entry.file_id, &target_dir).await {
                downloaded += 1;
            } else {
                failed.push(*entry);
            }
        }
        pb.finish_and_clear();

        let failed_count = failed.len();
        manifest
            .derive("failed", failed)
            .save(&self.config.failed_manifest_path)
            .context("Failed to write failed manifest")?;

        Ok(InstallSummary {
            processed: files.len(),
            downloaded,
            failed: failed_count,
            failed_path: self.config.failed_manifest_path.clone(),
        })
    }

    fn manifest_dir(&self, manifest: &Manifest) -> PathBuf {
        let name = utils::sanitize_dir_name(&manifest.name);
        if name.is_empty() {
            self.config.download_dir.clone()
        } else {
            self.config.download_dir.join(name)
        }
    }

    async fn download(&self, project_id: u32, file_id: u32, dir: &Path) -> bool {
        let timer = Instant::now();
        match self.curseforge.download_file(project_id, file_id, dir).await {
            Ok(info) => {
                info!(
                    "Downloaded {} ({} bytes) in {}ms",
                    info.file_name,
                    info.bytes,
                    timer.elapsed().as_millis()
                );
                true
            }
            Err(e) => {
                warn!("Download of project {} file {} failed: {}", project_id, file_id, e);
                false
            }
        }
    }
}

/// Writes the failed modlist, then the cache. A failure of either write does
/// not prevent the other.
fn persist_run(cache: &ModCache, failed_path: &Path, failed: &[ModReference]) -> Result<()> {
    let failed_written =
        modlist::write_modlist(failed_path, failed).context("Failed to write failed modlist");
    cache.save()?;
    failed_written
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Failed to create progress bar style")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
