//! Filesystem store for golden reference images.
//!
//! Blobs live under a single root, one subdirectory per drug, and are
//! addressed by refs relative to that root (stored inside the records), so
//! the whole tree can be relocated without rewriting the registry.

use crate::error::{RegistryError, RegistryResult};
use anyhow::Context;
use async_trait::async_trait;
use checkmed_core::{FormFactor, ImageBlob, ImageStore};
use std::path::{Component, Path, PathBuf};

/// Which reference image of a record a blob is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Package,
    Secondary,
}

impl ImageKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Secondary => "blister_pack",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageDir {
    root: PathBuf,
}

impl ImageDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store a reference image and return its ref.
    ///
    /// Refs encode name, form factor and kind
    /// (`artcin/artcin_tablet_package.jpg`), so the two form-factor records
    /// of one drug never clobber each other's images.
    pub fn save(
        &self,
        drug_name: &str,
        form: FormFactor,
        kind: ImageKind,
        mime_type: &str,
        bytes: &[u8],
    ) -> RegistryResult<String> {
        let name = drug_name.trim().to_lowercase();
        if name.is_empty() {
            return Err(RegistryError::InvalidRecord {
                message: "drug name must not be empty".to_string(),
            });
        }
        let filename = format!(
            "{name}_{form}_{kind}.{ext}",
            kind = kind.suffix(),
            ext = ext_for_mime(mime_type)
        );
        let image_ref = format!("{name}/{filename}");
        let dir = self.root.join(&name);
        std::fs::create_dir_all(&dir).map_err(|e| RegistryError::ImageIo {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = dir.join(&filename);
        std::fs::write(&path, bytes).map_err(|e| RegistryError::ImageIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(image_ref = %image_ref, bytes = bytes.len(), "stored reference image");
        Ok(image_ref)
    }

    /// Best-effort removal, used to undo a half-finished registration.
    pub fn remove(&self, image_ref: &str) {
        if let Ok(path) = self.resolve(image_ref) {
            let _ = std::fs::remove_file(path);
        }
    }

    fn resolve(&self, image_ref: &str) -> RegistryResult<PathBuf> {
        let rel = Path::new(image_ref);
        // Refs come from the database, but refuse traversal anyway.
        if rel.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(RegistryError::ImageIo {
                path: image_ref.to_string(),
                message: "ref must be a plain relative path".to_string(),
            });
        }
        Ok(self.root.join(rel))
    }

    pub fn read(&self, image_ref: &str) -> RegistryResult<ImageBlob> {
        let path = self.resolve(image_ref)?;
        let bytes = std::fs::read(&path).map_err(|e| RegistryError::ImageIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(ImageBlob::new(bytes, mime_for_ref(image_ref)))
    }
}

#[async_trait]
impl ImageStore for ImageDir {
    async fn load(&self, image_ref: &str) -> anyhow::Result<ImageBlob> {
        self.read(image_ref)
            .with_context(|| format!("failed to load reference image '{image_ref}'"))
    }
}

fn ext_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

fn mime_for_ref(image_ref: &str) -> &'static str {
    match Path::new(image_ref).extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
