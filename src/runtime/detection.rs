// ABOUTME: Local engine endpoint detection.
// ABOUTME: Explicit config, then DOCKER_HOST, then Podman and Docker sockets.

use super::types::{RuntimeConfig, RuntimeInfo, RuntimeType};
use std::path::Path;

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked DOCKER_HOST, Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("unsupported DOCKER_HOST value: {0} (expected unix:// or tcp://)")]
    UnsupportedHost(String),
}

/// Resolve the engine endpoint on this machine.
///
/// Detection order:
/// 1. `engine.socket` / `engine.runtime` from the profile document
/// 2. `DOCKER_HOST`
/// 3. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 4. Rootful Podman socket (`/run/podman/podman.sock`)
/// 5. Docker socket (`/var/run/docker.sock`)
pub fn detect_local(config: &RuntimeConfig) -> Result<RuntimeInfo, DetectionError> {
    if let Some(ref socket) = config.socket {
        return Ok(RuntimeInfo {
            runtime_type: config.runtime.unwrap_or(RuntimeType::Docker),
            endpoint: socket.clone(),
        });
    }

    if let Some(runtime_type) = config.runtime {
        return Ok(RuntimeInfo {
            runtime_type,
            endpoint: default_socket_path(runtime_type),
        });
    }

    if let Some(host) = std::env::var("DOCKER_HOST").ok().filter(|h| !h.is_empty()) {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            endpoint: endpoint_from_docker_host(&host)?,
        });
    }

    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{uid}/podman/podman.sock");
        if Path::new(&rootless_socket).exists() {
            return Ok(RuntimeInfo {
                runtime_type: RuntimeType::Podman,
                endpoint: rootless_socket,
            });
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Podman,
            endpoint: ROOTFUL_PODMAN.to_string(),
        });
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            endpoint: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

/// Translate a `DOCKER_HOST` value into an endpoint the client can dial.
/// `unix://` yields a socket path; `tcp://` and `http://` are kept as-is.
pub fn endpoint_from_docker_host(host: &str) -> Result<String, DetectionError> {
    if let Some(path) = host.strip_prefix("unix://") {
        return Ok(path.to_string());
    }
    if host.starts_with("tcp://") || host.starts_with("http://") {
        return Ok(host.to_string());
    }
    if host.starts_with('/') {
        return Ok(host.to_string());
    }
    Err(DetectionError::UnsupportedHost(host.to_string()))
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_host_becomes_path() {
        assert_eq!(
            endpoint_from_docker_host("unix:///run/user/1000/docker.sock").unwrap(),
            "/run/user/1000/docker.sock"
        );
    }

    #[test]
    fn tcp_host_is_kept() {
        assert_eq!(
            endpoint_from_docker_host("tcp://127.0.0.1:2375").unwrap(),
            "tcp://127.0.0.1:2375"
        );
    }

    #[test]
    fn ssh_host_is_rejected() {
        assert!(matches!(
            endpoint_from_docker_host("ssh://builder"),
            Err(DetectionError::UnsupportedHost(_))
        ));
    }

    #[test]
    fn explicit_socket_wins() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Podman),
            socket: Some("/tmp/podman.sock".to_string()),
            ..Default::default()
        };
        let info = detect_local(&config).unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Podman);
        assert_eq!(info.endpoint, "/tmp/podman.sock");
    }

    #[test]
    fn explicit_runtime_uses_default_socket() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Docker),
            ..Default::default()
        };
        assert_eq!(detect_local(&config).unwrap().endpoint, DOCKER_SOCKET);
    }
}
