// ABOUTME: Diagnostics accumulator for non-fatal cleanup warnings.
// ABOUTME: Collects warnings that shouldn't fail a probe but should be shown to users.

/// Collects non-fatal warnings during a probe run.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. Printing is left to the caller's output mode.
    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A cleanup step that did not complete. The probe result stands regardless.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn container_removal(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ContainerRemoval,
            message: message.into(),
        }
    }

    pub fn image_removal(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ImageRemoval,
            message: message.into(),
        }
    }

    pub fn dockerfile_removal(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DockerfileRemoval,
            message: message.into(),
        }
    }

    pub fn prune(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Prune,
            message: message.into(),
        }
    }

    pub fn base_image_fallback(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::BaseImageFallback,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    ContainerRemoval,
    ImageRemoval,
    DockerfileRemoval,
    /// Dangling image prune failed.
    Prune,
    /// Pull failed but a local copy of the base image was used.
    BaseImageFallback,
}
