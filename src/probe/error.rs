// ABOUTME: Per-profile failures caught at the orchestrator boundary.
// ABOUTME: Each maps to the stage reported in a failed outcome.

use super::outcome::Stage;
use crate::dockerfile::DockerfileError;
use crate::runtime::{ContainerError, ImageError, LogError};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("cannot tokenize command {0:?}: unbalanced quotes or trailing escape")]
    Command(String),

    #[error(transparent)]
    Dockerfile(#[from] DockerfileError),

    #[error("failed to pull base image: {0}")]
    Pull(#[source] ImageError),

    #[error(transparent)]
    Build(ImageError),

    #[error("failed to run container: {0}")]
    Run(#[from] ContainerError),

    #[error("failed to capture output: {0}")]
    Logs(#[from] LogError),
}

impl ProbeError {
    pub fn stage(&self) -> Stage {
        match self {
            ProbeError::Command(_) => Stage::Command,
            ProbeError::Dockerfile(_) => Stage::Dockerfile,
            ProbeError::Pull(_) => Stage::Pull,
            ProbeError::Build(_) => Stage::Build,
            ProbeError::Run(_) => Stage::Run,
            ProbeError::Logs(_) => Stage::Logs,
        }
    }
}
