// ABOUTME: Bollard-based container engine implementation.
// ABOUTME: Supports both Docker and Podman via Docker-compatible API.

use crate::dockerfile;
use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    BuildRequest, CapturedOutput, ContainerError, ContainerHandle, ContainerOps, EngineMetadata,
    ImageError, ImageMetadata, ImageOps, LogError, LogOps, RunRequest, RuntimeInfo,
    RuntimeInfoError,
};
use crate::runtime::detection::detect_local;
use crate::runtime::error::{ConnectionSnafu, RuntimeError};
use crate::runtime::types::{RuntimeConfig, RuntimeType};
use crate::types::{ContainerId, ImageId, ImageRef};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    BuildImageOptions, CreateContainerOptions, CreateImageOptions, LogsOptions,
    PruneImagesOptions, RemoveContainerOptions, RemoveImageOptions, StartContainerOptions,
    WaitContainerOptions,
};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::{Either, Full};
use snafu::ResultExt;
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_pull_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        _ => ImageError::PullFailed(format!("{image_name}: {e}")),
    }
}

fn map_image_remove_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 409 =>
        {
            ImageError::InUse(image_name.to_string())
        }
        _ => ImageError::Runtime(format!("failed to remove {image_name}: {e}")),
    }
}

fn map_container_create_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::ImageNotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::AlreadyExists(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_start_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError { message, .. } => {
            ContainerError::StartFailed(message.clone())
        }
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_not_found_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_log_error(e: bollard::errors::Error) -> LogError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => LogError::ContainerNotFound(message.clone()),
        _ => LogError::StreamError(e.to_string()),
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// One engine session, shared by every step of a probe run.
///
/// Supports both Docker and Podman via Docker-compatible API. The client is
/// released when the value is dropped.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
    endpoint: String,
}

impl BollardRuntime {
    pub fn new(client: Docker, runtime_type: RuntimeType, endpoint: String) -> Self {
        Self {
            client,
            runtime_type,
            endpoint,
        }
    }

    /// Connect to a container runtime using detected runtime info.
    ///
    /// Construction is lazy: an unreachable daemon only shows up on the first
    /// request, which is why callers ping right after connecting.
    pub fn connect(
        info: &super::types::RuntimeInfo,
        timeout: Duration,
    ) -> Result<Self, RuntimeInfoError> {
        let secs = timeout.as_secs().max(1);
        let client = if info.endpoint.starts_with("tcp://") || info.endpoint.starts_with("http://")
        {
            Docker::connect_with_http(&info.endpoint, secs, bollard::API_DEFAULT_VERSION)
        } else {
            Docker::connect_with_unix(&info.endpoint, secs, bollard::API_DEFAULT_VERSION)
        }
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        Ok(Self::new(client, info.runtime_type, info.endpoint.clone()))
    }

    /// Detect the local engine and open the session used for the whole run.
    pub fn open(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let info = detect_local(config)?;
        tracing::debug!(
            runtime = %info.runtime_type,
            endpoint = %info.endpoint,
            "using container engine"
        );
        Self::connect(&info, config.timeout).context(ConnectionSnafu {
            endpoint: info.endpoint.clone(),
        })
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn inspect_image(&self, reference: &str) -> Result<ImageMetadata, ImageError> {
        let details = self
            .client
            .inspect_image(reference)
            .await
            .map_err(|e| match e {
                bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                } => ImageError::NotFound(reference.to_string()),
                e => ImageError::Runtime(format!("failed to inspect {reference}: {e}")),
            })?;

        Ok(ImageMetadata {
            id: ImageId::new(details.id.unwrap_or_default()),
            size_bytes: details.size.unwrap_or(0).max(0) as u64,
            architecture: details.architecture.unwrap_or_default(),
            os: details.os.unwrap_or_default(),
        })
    }

    /// Block until the container exits and return its status code.
    async fn wait_for_exit(&self, id: &ContainerId) -> Result<i64, ContainerError> {
        let mut stream = self
            .client
            .wait_container(id.as_str(), None::<WaitContainerOptions>);

        let mut exit_code = 0;
        while let Some(item) = stream.next().await {
            match item {
                Ok(response) => {
                    exit_code = response.status_code;
                    if let Some(message) = response
                        .error
                        .and_then(|e| e.message)
                        .filter(|m| !m.is_empty())
                    {
                        return Err(ContainerError::WaitFailed(message));
                    }
                }
                // Bollard reports a non-zero exit as an error; for a probe it
                // is just a result.
                Err(bollard::errors::Error::DockerContainerWaitError { code, .. }) => {
                    exit_code = code;
                }
                Err(e) => return Err(ContainerError::WaitFailed(e.to_string())),
            }
        }

        Ok(exit_code)
    }
}

impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<EngineMetadata, RuntimeInfoError> {
        let info = self
            .client
            .info()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(EngineMetadata {
            name,
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image_name = reference.to_string();

        let opts = CreateImageOptions {
            from_image: Some(image_name.clone()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            let progress = result.map_err(|e| map_image_pull_error(e, &image_name))?;
            if let Some(status) = progress.status {
                tracing::trace!(image = %image_name, "{}", status);
            }
        }

        Ok(())
    }

    async fn image_exists(&self, reference: &str) -> Result<bool, ImageError> {
        match self.inspect_image(reference).await {
            Ok(_) => Ok(true),
            Err(ImageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn build_image(&self, request: &BuildRequest) -> Result<ImageMetadata, ImageError> {
        let tag = request.tag.to_string();
        let build_failed = |message: String| ImageError::BuildFailed {
            tag: tag.clone(),
            message,
        };

        let context =
            dockerfile::build_context(&request.dockerfile).map_err(|e| build_failed(e.to_string()))?;

        let options = BuildImageOptions {
            dockerfile: dockerfile::context_entry_name(&request.dockerfile),
            t: Some(tag.clone()),
            rm: true,
            forcerm: true,
            ..Default::default()
        };

        let body = Either::Left(Full::new(Bytes::from(context)));
        let mut build_stream = self.client.build_image(options, None, Some(body));

        while let Some(result) = build_stream.next().await {
            let output = result.map_err(|e| build_failed(e.to_string()))?;
            if let Some(detail) = output.error_detail {
                return Err(build_failed(
                    detail.message.unwrap_or_else(|| "unknown build error".to_string()),
                ));
            }
            if let Some(line) = output.stream {
                let line = line.trim_end();
                if !line.is_empty() {
                    tracing::debug!(tag = %tag, "{}", line);
                }
            }
        }

        self.inspect_image(&tag).await
    }

    async fn remove_image(&self, reference: &str, force: bool) -> Result<(), ImageError> {
        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(reference, Some(opts), None)
            .await
            .map_err(|e| map_image_remove_error(e, reference))?;

        Ok(())
    }

    async fn prune_dangling(&self) -> Result<u64, ImageError> {
        let mut filters = HashMap::new();
        filters.insert("dangling".to_string(), vec!["true".to_string()]);

        let opts = PruneImagesOptions {
            filters: Some(filters),
        };

        let response = self
            .client
            .prune_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(format!("prune failed: {e}")))?;

        Ok(response.space_reclaimed.unwrap_or(0).max(0) as u64)
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn run_container(&self, request: &RunRequest) -> Result<ContainerHandle, ContainerError> {
        // No TTY, so the engine keeps stdout and stderr apart.
        let body = ContainerCreateBody {
            image: Some(request.image.to_string()),
            cmd: Some(request.command.clone()),
            tty: Some(false),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(request.name.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_create_error)?;
        let id = ContainerId::new(response.id);

        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_start_error)?;

        let exit_code = self.wait_for_exit(&id).await?;
        tracing::debug!(container = %request.name, exit_code, "container exited");

        Ok(ContainerHandle {
            id,
            name: request.name.clone(),
            exit_code,
        })
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_not_found_error)?;

        Ok(())
    }
}

#[async_trait]
impl LogOps for BollardRuntime {
    async fn capture_output(&self, id: &ContainerId) -> Result<CapturedOutput, LogError> {
        let log_opts = LogsOptions {
            stdout: true,
            stderr: true,
            follow: false,
            timestamps: false,
            tail: "all".to_string(),
            ..Default::default()
        };

        let mut stream = self.client.logs(id.as_str(), Some(log_opts));

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        while let Some(item) = stream.next().await {
            match item.map_err(map_log_error)? {
                bollard::container::LogOutput::StdErr { message } => stderr.extend(message),
                bollard::container::LogOutput::StdOut { message }
                | bollard::container::LogOutput::Console { message } => stdout.extend(message),
                bollard::container::LogOutput::StdIn { .. } => {}
            }
        }

        Ok(CapturedOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}
