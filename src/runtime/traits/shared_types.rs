// ABOUTME: Request and response types shared by the engine traits.
// ABOUTME: BuildRequest, ImageMetadata, RunRequest, ContainerHandle, CapturedOutput.

use crate::types::{ContainerId, ImageId, ImageTag};
use std::path::PathBuf;

/// Build one profile image.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Generated Dockerfile; becomes the only file in the build context.
    pub dockerfile: PathBuf,
    /// Tag applied to the built image.
    pub tag: ImageTag,
}

/// What the engine reports about a built image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata {
    pub id: ImageId,
    pub size_bytes: u64,
    pub architecture: String,
    pub os: String,
}

impl ImageMetadata {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Run one command in a fresh container.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub image: ImageTag,
    pub command: Vec<String>,
    pub name: String,
}

/// An exited container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerHandle {
    pub id: ContainerId,
    pub name: String,
    pub exit_code: i64,
}

/// Full output of a container, one string per stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Engine identity, logged when a session opens.
#[derive(Debug, Clone)]
pub struct EngineMetadata {
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
}
