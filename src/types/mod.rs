// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Image references, image tags, and phantom-typed engine ids.

mod id;
mod image_ref;
mod image_tag;

pub use id::{ContainerId, ImageId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use image_tag::{ImageTag, ImageTagError};
