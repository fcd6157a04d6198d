// ABOUTME: Container engine facade for Docker and Podman.
// ABOUTME: Detects the local socket, connects once, and exposes capability traits.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local, endpoint_from_docker_host};
pub use error::{ConnectionSnafu, RuntimeError, RuntimeErrorKind, UnreachableSnafu};
pub use traits::{
    BuildRequest, CapturedOutput, ContainerError, ContainerHandle, ContainerOps, Engine,
    EngineMetadata, ImageError, ImageMetadata, ImageOps, LogError, LogOps, RunRequest,
    RuntimeInfo as RuntimeInfoTrait, RuntimeInfoError,
};
pub use types::{DEFAULT_TIMEOUT, RuntimeConfig, RuntimeInfo, RuntimeType};
