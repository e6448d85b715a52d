use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode::decode_image,
    foundation::error::{ChoreoError, ChoreoResult},
};

/// Decoded straight-alpha RGBA8 image ready for drawing.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<image::RgbaImage>,
}

impl PreparedImage {
    pub fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: Arc::new(rgba),
        }
    }
}

/// Resolves asset keys to drawable images.
///
/// `None` means "not loaded (yet)"; callers draw nothing in that case.
pub trait AssetProvider {
    fn image(&self, key: &str) -> Option<&PreparedImage>;
}

/// Provider with no assets; every image is a transparent placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn image(&self, _key: &str) -> Option<&PreparedImage> {
        None
    }
}

/// Images loaded up front from a root directory, keyed by normalized
/// relative path. All IO happens here, never on the frame path.
#[derive(Clone, Debug, Default)]
pub struct PreparedAssetStore {
    root: PathBuf,
    images: HashMap<String, PreparedImage>,
}

impl PreparedAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn insert(&mut self, key: &str, image: PreparedImage) -> ChoreoResult<()> {
        let key = normalize_rel_path(key)?;
        self.images.insert(key, image);
        Ok(())
    }

    /// Read and decode one image relative to the root.
    pub fn load(&mut self, key: &str) -> ChoreoResult<()> {
        let norm = normalize_rel_path(key)?;
        if self.images.contains_key(&norm) {
            return Ok(());
        }
        let path = self.root.join(&norm);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image asset {}", path.display()))?;
        let image = decode_image(&bytes)
            .map_err(|e| ChoreoError::asset(format!("decode {}: {e}", path.display())))?;
        self.images.insert(norm, image);
        Ok(())
    }

    /// Load every key, logging and skipping failures so they degrade to
    /// transparent placeholders. Returns how many are now available.
    pub fn preload<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> usize {
        let mut ok = 0;
        for key in keys {
            match self.load(key) {
                Ok(()) => ok += 1,
                Err(err) => tracing::warn!(key, %err, "asset unavailable; drawing placeholder"),
            }
        }
        ok
    }

    /// Keep only entries whose key satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.images.retain(|k, _| keep(k));
    }

    pub fn contains(&self, key: &str) -> bool {
        normalize_rel_path(key).is_ok_and(|k| self.images.contains_key(&k))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetProvider for PreparedAssetStore {
    fn image(&self, key: &str) -> Option<&PreparedImage> {
        match normalize_rel_path(key) {
            Ok(k) => self.images.get(&k),
            Err(_) => None,
        }
    }
}

/// Normalize a relative asset path (`\` to `/`, drop `.`); reject absolute
/// paths and `..`.
pub fn normalize_rel_path(source: &str) -> ChoreoResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ChoreoError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ChoreoError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ChoreoError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ChoreoError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
