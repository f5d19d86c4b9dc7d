//! Port interfaces for blob uploads

use async_trait::async_trait;
use peek_domain::{ImageUpload, Result};

/// Trait for storing event images
#[async_trait]
pub trait BlobUploader: Send + Sync {
    /// Store `image` at `path` and return a publicly fetchable URL
    async fn upload(&self, path: &str, image: &ImageUpload) -> Result<String>;
}
