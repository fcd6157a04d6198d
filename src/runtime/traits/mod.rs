// ABOUTME: Composable capability traits for the container engine.
// ABOUTME: Defines RuntimeInfo, ImageOps, ContainerOps, LogOps and the Engine bundle.

mod container;
mod image;
mod logs;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps};
pub use logs::{LogError, LogOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;

/// Every capability a probe run needs. Implemented automatically.
pub trait Engine: RuntimeInfo + ImageOps + ContainerOps + LogOps {}

impl<T> Engine for T where T: RuntimeInfo + ImageOps + ContainerOps + LogOps {}
