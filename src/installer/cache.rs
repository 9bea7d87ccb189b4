use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Persistent `slug=id` mapping.
///
/// Loaded once at the start of a run, mutated in memory and written back
/// with [`ModCache::save`], which replaces the file with the in-memory
/// contents.
#[derive(Debug, Clone, Default)]
pub struct ModCache {
    path: PathBuf,
    mods: BTreeMap<String, u32>,
}

impl ModCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mods: BTreeMap::new(),
        }
    }

    /// A missing file is an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(path, &content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No mod cache at {}, starting empty", path.display());
                Ok(Self::new(path))
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read mod cache: {}", path.display())),
        }
    }

    /// Lines without `=`, with an empty key or with a non-numeric id are
    /// skipped. The first occurrence of a key wins. Ids never contain `=`, so
    /// the line is split at the last one and keys may contain it.
    pub fn parse(path: &Path, content: &str) -> Self {
        let mut cache = Self::new(path);
        for line in content.lines() {
            let Some((key, id)) = line.rsplit_once('=') else {
                continue;
            };
            let Ok(id) = id.trim().parse::<u32>() else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            cache.mods.entry(key.to_string()).or_insert(id);
        }
        cache
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        if key.is_empty() {
            return None;
        }
        self.mods.get(key).copied()
    }

    /// Returns `false` (and stores nothing) for a key that is empty or
    /// would span lines.
    pub fn put(&mut self, key: &str, id: u32) -> bool {
        if key.is_empty() || key.contains(['\n', '\r']) {
            return false;
        }
        self.mods.insert(key.to_string(), id);
        true
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.mods.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn serialize(&self) -> String {
        self.mods
            .iter()
            .map(|(key, id)| format!("{key}={id}\n"))
            .collect()
    }

    pub fn save(&self) -> Result<()> {
        let timer = Instant::now();
        crate::utils::write_file(&self.path, &self.serialize())
            .with_context(|| format!("Failed to write mod cache: {}", self.path.display()))?;
        info!(
            "Serialized {} cache entries in {}ms",
            self.len(),
            timer.elapsed().as_millis()
        );
        Ok(())
    }
}
