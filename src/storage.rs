//! Menu image blob storage on the local filesystem. Replacing or deleting a
//! menu item must remove the previously stored file so no orphaned assets
//! accumulate; that contract lives here and in `menu_service`.

use std::path::PathBuf;

use anyhow::Context;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Map an upload content type onto a stored file extension. Only a couple of
/// raster formats are accepted.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist image bytes under a fresh name and return the relative path
    /// stored on the menu row.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(format!(
                "Image exceeds the {} KiB limit",
                MAX_IMAGE_BYTES / 1024
            )));
        }
        let relative = format!("menu/{}.{extension}", Uuid::new_v4());
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(relative)
    }

    /// Remove a previously stored file. A file already gone is not an error;
    /// the row is the source of truth and the delete must stay idempotent.
    pub async fn delete(&self, relative: &str) -> AppResult<()> {
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Internal(anyhow::Error::new(err).context(format!(
                "deleting {}",
                path.display()
            )))),
        }
    }
}
