// ABOUTME: Result records produced for each probed profile.
// ABOUTME: A passed outcome carries a RunResult; a failed one names its stage.

use crate::runtime::ImageMetadata;
use crate::types::{ContainerId, ImageTag};
use serde::Serialize;
use std::fmt;

/// Captured outcome of building and running one profile's container.
///
/// Serializes as `id, name, command, stdout, stderr` in that order; the
/// remaining fields only feed the table and plain renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub id: ContainerId,
    pub name: String,
    pub command: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip)]
    pub image_tag: ImageTag,
    #[serde(skip)]
    pub exit_code: i64,
    #[serde(skip)]
    pub image: Option<ImageMetadata>,
}

/// Step at which a profile stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Command,
    Dockerfile,
    Pull,
    Build,
    Run,
    Logs,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Command => "command",
            Stage::Dockerfile => "dockerfile",
            Stage::Pull => "pull",
            Stage::Build => "build",
            Stage::Run => "run",
            Stage::Logs => "logs",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub image_tag: String,
    pub stage: Stage,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProbeOutcome {
    Passed(RunResult),
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeOutcome::Failed(_))
    }

    pub fn image_tag(&self) -> &str {
        match self {
            ProbeOutcome::Passed(result) => result.image_tag.as_str(),
            ProbeOutcome::Failed(failure) => &failure.image_tag,
        }
    }

    pub fn as_result(&self) -> Option<&RunResult> {
        match self {
            ProbeOutcome::Passed(result) => Some(result),
            ProbeOutcome::Failed(_) => None,
        }
    }
}
