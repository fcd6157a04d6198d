// ABOUTME: Image operations trait for the container engine.
// ABOUTME: Pull base images, build profile images, remove and prune.

use super::sealed::Sealed;
use super::shared_types::{BuildRequest, ImageMetadata};
use crate::types::ImageRef;
use async_trait::async_trait;

#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Pull an image from its registry.
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError>;

    /// Check whether an image is present locally.
    async fn image_exists(&self, reference: &str) -> Result<bool, ImageError>;

    /// Build the Dockerfile named in `request` and tag the result.
    async fn build_image(&self, request: &BuildRequest) -> Result<ImageMetadata, ImageError>;

    /// Remove an image by tag or id.
    async fn remove_image(&self, reference: &str, force: bool) -> Result<(), ImageError>;

    /// Remove dangling images. Returns the number of bytes reclaimed.
    async fn prune_dangling(&self) -> Result<u64, ImageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("build of {tag} failed: {message}")]
    BuildFailed { tag: String, message: String },

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
