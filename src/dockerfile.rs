// ABOUTME: Dockerfile generation and on-disk handling.
// ABOUTME: Renders FROM/RUN files, writes and removes them, and packs build contexts.

use crate::types::{ImageRef, ImageTag};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Filesystem failures while handling a generated Dockerfile.
#[derive(Debug, thiserror::Error)]
pub enum DockerfileError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to archive build context for {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render a Dockerfile: one `FROM` line followed by a `RUN` line per command.
///
/// Commands keep their order since later steps usually depend on earlier ones
/// (an index refresh before an install). Nothing is validated here; a bad
/// command surfaces as a build failure.
pub fn render(base_image: &ImageRef, commands: &[String]) -> String {
    let mut out = format!("FROM {base_image}\n");
    for command in commands {
        let _ = writeln!(out, "RUN {command}");
    }
    out
}

/// `<dir>/Dockerfile.<tag>`
pub fn dockerfile_path(dir: &Path, tag: &ImageTag) -> PathBuf {
    dir.join(format!("Dockerfile.{tag}"))
}

/// Write `text` to `path`, creating parent directories.
pub fn write(text: &str, path: &Path) -> Result<PathBuf, DockerfileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DockerfileError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, text).map_err(|source| DockerfileError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "wrote Dockerfile");
    Ok(path.to_path_buf())
}

pub fn read(path: &Path) -> Result<String, DockerfileError> {
    std::fs::read_to_string(path).map_err(|source| DockerfileError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn remove(path: &Path) -> Result<(), DockerfileError> {
    std::fs::remove_file(path).map_err(|source| DockerfileError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

/// Pack the Dockerfile at `path` into a tar archive usable as a build
/// context. The entry keeps its file name, which is what the build request
/// must name as its dockerfile.
pub fn build_context(path: &Path) -> Result<Vec<u8>, DockerfileError> {
    let content = std::fs::read(path).map_err(|source| DockerfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let archive_err = |source: std::io::Error| DockerfileError::Archive {
        path: path.to_path_buf(),
        source,
    };

    let name = context_entry_name(path);
    let mut ar = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_path(&name).map_err(archive_err)?;
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    ar.append(&header, content.as_slice()).map_err(archive_err)?;
    ar.into_inner().map_err(archive_err)
}

/// File name of the Dockerfile inside the build context.
pub fn context_entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Dockerfile".to_string())
}
