// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Everything that makes the engine unavailable for the whole run.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

/// The engine could not be reached. Fatal for the invocation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("failed to connect to {endpoint}: {source}"))]
    Connection {
        endpoint: String,
        source: RuntimeInfoError,
    },

    #[snafu(display("{endpoint} did not answer ping: {source}"))]
    Unreachable {
        endpoint: String,
        source: RuntimeInfoError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No container runtime found on the system.
    NoRuntimeFound,
    /// `DOCKER_HOST` names a scheme the client cannot dial.
    UnsupportedHost,
    /// The client could not be constructed for the endpoint.
    ConnectionFailed,
    /// The client exists but the daemon does not respond.
    NotResponding,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => RuntimeErrorKind::NoRuntimeFound,
                DetectionError::UnsupportedHost(_) => RuntimeErrorKind::UnsupportedHost,
            },
            RuntimeError::Connection { .. } => RuntimeErrorKind::ConnectionFailed,
            RuntimeError::Unreachable { .. } => RuntimeErrorKind::NotResponding,
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}
