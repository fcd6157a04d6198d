// ABOUTME: Log capture trait for the container engine.
// ABOUTME: Reads the complete stdout and stderr of an exited container.

use super::sealed::Sealed;
use super::shared_types::CapturedOutput;
use crate::types::ContainerId;
use async_trait::async_trait;

#[async_trait]
pub trait LogOps: Sealed + Send + Sync {
    /// Collect both output streams. Each stream is complete, but no ordering
    /// between them is preserved.
    async fn capture_output(&self, id: &ContainerId) -> Result<CapturedOutput, LogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("stream error: {0}")]
    StreamError(String),
}
