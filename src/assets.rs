use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Assets pre-populated into the cache at startup.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "index.html",
    "manifest.json",
    "images/icons/icon-192x192.png",
    "images/icons/icon-512x512.png",
];

/// Cache-first asset store. Assets live under `<root>/<name>/`, where `name`
/// doubles as the cache version: bumping it makes `activate` drop the old
/// directory wholesale.
#[derive(Debug, Clone)]
pub struct AssetCache {
    name: String,
    source: PathBuf,
    root: PathBuf,
}

impl AssetCache {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            root: root.into(),
        }
    }

    fn cache_dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// Pre-copy the fixed asset list into the current cache directory.
    /// Missing source files are skipped with a warning.
    pub fn install(&self) -> Result<()> {
        fs::create_dir_all(self.cache_dir())
            .with_context(|| format!("creating cache dir {}", self.cache_dir().display()))?;
        for rel in PRECACHE_MANIFEST {
            let from = self.source.join(rel);
            if !from.is_file() {
                tracing::warn!(asset = rel, "precache asset missing from source dir");
                continue;
            }
            self.store_copy(rel, &from)?;
            tracing::debug!(asset = rel, "precached");
        }
        Ok(())
    }

    /// Delete sibling cache directories left behind by earlier versions.
    pub fn activate(&self) -> Result<()> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Ok(());
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && entry.file_name() != self.name.as_str() {
                tracing::info!(cache = %entry.file_name().to_string_lossy(), "deleting old cache");
                fs::remove_dir_all(&path)
                    .with_context(|| format!("removing stale cache {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Cache-first lookup: serve the cached copy when present, else read the
    /// source file, keep a copy for next time, and serve it.
    pub fn fetch(&self, rel: &str) -> Result<Option<Vec<u8>>> {
        if !is_safe_path(rel) {
            return Ok(None);
        }

        let cached = self.cache_dir().join(rel);
        if cached.is_file() {
            return Ok(Some(fs::read(&cached)?));
        }

        let origin = self.source.join(rel);
        if !origin.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&origin)?;
        if let Err(err) = self.store_copy(rel, &origin) {
            tracing::warn!(error = %err, asset = rel, "caching asset failed");
        }
        Ok(Some(bytes))
    }

    fn store_copy(&self, rel: &str, from: &Path) -> Result<()> {
        let to = self.cache_dir().join(rel);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, &to).with_context(|| format!("caching {}", to.display()))?;
        Ok(())
    }
}

fn is_safe_path(rel: &str) -> bool {
    !rel.is_empty()
        && !rel.starts_with('/')
        && !rel.split('/').any(|seg| seg.is_empty() || seg == "..")
}
