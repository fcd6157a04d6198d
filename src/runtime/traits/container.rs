// ABOUTME: Container operations trait for the container engine.
// ABOUTME: Run a command to completion and remove the container afterward.

use super::sealed::Sealed;
use super::shared_types::{ContainerHandle, RunRequest};
use crate::types::ContainerId;
use async_trait::async_trait;

#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// Create a container, start it, and wait for it to exit.
    async fn run_container(&self, request: &RunRequest) -> Result<ContainerHandle, ContainerError>;

    /// Remove a container. The engine accepts a name wherever it accepts an id.
    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("container failed to start: {0}")]
    StartFailed(String),

    #[error("waiting for container failed: {0}")]
    WaitFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
