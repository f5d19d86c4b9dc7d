//! Filesystem-backed image uploads.
//!
//! Files land under `root_dir/{path}` and are published as
//! `{public_base_url}/{path}`; serving the directory is left to whatever
//! fronts the application.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use peek_core::BlobUploader;
use peek_domain::{ImageUpload, MediaConfig, PeekError, Result};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// `BlobUploader` that writes to a local directory
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: Url,
}

impl LocalBlobStore {
    /// # Errors
    /// Returns `PeekError::Config` when `public_base_url` is not a valid
    /// absolute URL.
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Result<Self> {
        let mut base = public_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| PeekError::Config(format!("invalid media base url '{base}': {err}")))?;

        Ok(Self { root: root.into(), base_url })
    }

    pub fn from_config(config: &MediaConfig) -> Result<Self> {
        Self::new(&config.root_dir, &config.public_base_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobUploader for LocalBlobStore {
    async fn upload(&self, path: &str, image: &ImageUpload) -> Result<String> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && !path.contains("/./")
            && relative.components().all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(PeekError::InvalidInput(format!("invalid upload path '{path}'")));
        }

        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| PeekError::from(InfraError::from(err)))?;
        }
        tokio::fs::write(&target, &image.bytes)
            .await
            .map_err(|err| PeekError::from(InfraError::from(err)))?;

        let url = self
            .base_url
            .join(path)
            .map_err(|err| PeekError::UploadFailed(format!("cannot build public url: {err}")))?;

        debug!(path, bytes = image.bytes.len(), "image stored");
        Ok(url.to_string())
    }
}
