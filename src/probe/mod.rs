// ABOUTME: Run orchestrator: generate, build, run, capture, and clean up per profile.
// ABOUTME: Profiles run one at a time; a failing profile never stops the batch.

mod command;
mod error;
mod outcome;

pub use command::{container_name, effective_command, tokenize, trim_output};
pub use error::ProbeError;
pub use outcome::{ProbeFailure, ProbeOutcome, RunResult, Stage};

use crate::config::{Profile, Target};
use crate::diagnostics::{Diagnostics, Warning};
use crate::dockerfile::{self, DockerfileError};
use crate::output::Output;
use crate::runtime::{
    BuildRequest, ContainerError, ContainerOps, Engine, ImageError, ImageOps, RunRequest,
    RuntimeError, RuntimeInfoTrait, UnreachableSnafu,
};
use crate::types::{ContainerId, ImageTag};
use snafu::ResultExt;
use std::path::PathBuf;

/// Invocation settings, built from the command line and consumed once.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: Target,
    pub custom_name: Option<String>,
    /// Directory that receives the generated Dockerfiles.
    pub output_dir: PathBuf,
    pub command_override: Option<String>,
    /// Used when neither an override nor a profile command applies.
    pub default_command: String,
    /// Remove the container, image, and Dockerfile after each profile.
    pub clean: bool,
}

/// Exit status when at least one profile failed. Clap already exits with 2
/// on usage errors.
pub const EXIT_PROFILE_FAILED: u8 = 3;

/// Process exit status for a finished batch.
pub fn exit_status(outcomes: &[ProbeOutcome]) -> u8 {
    if outcomes.iter().any(ProbeOutcome::is_failure) {
        EXIT_PROFILE_FAILED
    } else {
        0
    }
}

/// Check the engine answers before any profile is touched.
pub async fn ensure_engine(
    engine: &impl RuntimeInfoTrait,
    endpoint: &str,
) -> Result<(), RuntimeError> {
    engine
        .ping()
        .await
        .context(UnreachableSnafu { endpoint })?;

    match engine.info().await {
        Ok(meta) => tracing::debug!(
            engine = %meta.name,
            version = %meta.version,
            os = %meta.os,
            arch = %meta.arch,
            "engine reachable"
        ),
        Err(e) => tracing::debug!("engine answered ping but not info: {}", e),
    }
    Ok(())
}

/// Probe every profile in order and collect one outcome per profile.
///
/// Only an unreachable engine aborts the run; everything else is recorded in
/// the returned outcomes, and cleanup problems land in `diag`.
pub async fn execute<E: Engine>(
    engine: &E,
    endpoint: &str,
    profiles: &[Profile],
    config: &RunConfig,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<Vec<ProbeOutcome>, RuntimeError> {
    ensure_engine(engine, endpoint).await?;

    let total = profiles.len();
    output.progress(&format!("Probing {total} profile(s)"));

    let mut outcomes = Vec::with_capacity(total);
    for (i, profile) in profiles.iter().enumerate() {
        output.progress(&format!(
            "[{}/{}] {} ({})",
            i + 1,
            total,
            profile.image_tag,
            profile.base_image
        ));

        let outcome = probe_profile(engine, profile, i + 1, config, diag).await;
        match &outcome {
            ProbeOutcome::Passed(result) => output.progress(&format!(
                "  ✓ {} exited with {}",
                result.name, result.exit_code
            )),
            ProbeOutcome::Failed(failure) => output.progress(&format!(
                "  ✗ {} failed: {}",
                failure.stage, failure.error
            )),
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Resources created for one profile, so cleanup knows what to remove.
#[derive(Default)]
struct Artifacts {
    dockerfile: Option<PathBuf>,
    image: Option<ImageTag>,
    container: Option<ContainerId>,
}

async fn probe_profile<E: Engine>(
    engine: &E,
    profile: &Profile,
    position: usize,
    config: &RunConfig,
    diag: &mut Diagnostics,
) -> ProbeOutcome {
    let mut artifacts = Artifacts::default();
    let result = run_steps(engine, profile, position, config, &mut artifacts, diag).await;

    if config.clean {
        cleanup(engine, &artifacts, diag).await;
    }

    match result {
        Ok(result) => ProbeOutcome::Passed(result),
        Err(e) => {
            tracing::debug!(tag = %profile.image_tag, stage = %e.stage(), "{}", e);
            ProbeOutcome::Failed(ProbeFailure {
                image_tag: profile.image_tag.to_string(),
                stage: e.stage(),
                error: e.to_string(),
            })
        }
    }
}

async fn run_steps<E: Engine>(
    engine: &E,
    profile: &Profile,
    position: usize,
    config: &RunConfig,
    artifacts: &mut Artifacts,
    diag: &mut Diagnostics,
) -> Result<RunResult, ProbeError> {
    let tag = &profile.image_tag;

    let command = effective_command(
        config.command_override.as_deref(),
        profile,
        &config.default_command,
    );
    let argv = tokenize(command)?;

    let path = dockerfile::dockerfile_path(&config.output_dir, tag);
    let text = dockerfile::render(&profile.base_image, &profile.commands);
    artifacts.dockerfile = Some(dockerfile::write(&text, &path)?);

    if let Err(e) = engine.pull_image(&profile.base_image).await {
        let base = profile.base_image.to_string();
        match engine.image_exists(&base).await {
            Ok(true) => diag.warn(Warning::base_image_fallback(format!(
                "pull of {base} failed, using local copy: {e}"
            ))),
            _ => return Err(ProbeError::Pull(e)),
        }
    }

    let image = engine
        .build_image(&BuildRequest {
            dockerfile: path,
            tag: tag.clone(),
        })
        .await
        .map_err(ProbeError::Build)?;
    artifacts.image = Some(tag.clone());
    tracing::debug!(
        tag = %tag,
        id = %image.id.short(),
        size_mb = image.size_mb(),
        "image built"
    );

    let name = container_name(tag, chrono::Utc::now().timestamp(), position);
    // A failed start still leaves a created container behind.
    artifacts.container = Some(ContainerId::new(name.clone()));
    let handle = engine
        .run_container(&RunRequest {
            image: tag.clone(),
            command: argv.clone(),
            name,
        })
        .await?;
    artifacts.container = Some(handle.id.clone());

    let captured = engine.capture_output(&handle.id).await?;

    Ok(RunResult {
        id: handle.id,
        name: handle.name,
        command: argv,
        stdout: trim_output(&captured.stdout),
        stderr: trim_output(&captured.stderr),
        image_tag: tag.clone(),
        exit_code: handle.exit_code,
        image: Some(image),
    })
}

/// Best-effort removal of whatever this profile created.
async fn cleanup<E: ImageOps + ContainerOps>(
    engine: &E,
    artifacts: &Artifacts,
    diag: &mut Diagnostics,
) {
    if let Some(ref id) = artifacts.container {
        match engine.remove_container(id, true).await {
            Ok(()) => tracing::debug!(container = %id, "container removed"),
            Err(ContainerError::NotFound(_)) => {}
            Err(e) => diag.warn(Warning::container_removal(format!(
                "failed to remove container {id}: {e}"
            ))),
        }
    }

    if let Some(ref tag) = artifacts.image {
        match engine.remove_image(tag.as_str(), true).await {
            Ok(()) => tracing::debug!(image = %tag, "image removed"),
            Err(ImageError::NotFound(_)) => {}
            Err(e) => diag.warn(Warning::image_removal(format!(
                "failed to remove image {tag}: {e}"
            ))),
        }
    }

    if let Some(ref path) = artifacts.dockerfile {
        match dockerfile::remove(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Dockerfile removed"),
            Err(DockerfileError::Remove { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => diag.warn(Warning::dockerfile_removal(e.to_string())),
        }
    }

    match engine.prune_dangling().await {
        Ok(0) => {}
        Ok(bytes) => tracing::debug!(bytes, "pruned dangling images"),
        Err(e) => diag.warn(Warning::prune(e.to_string())),
    }
}
