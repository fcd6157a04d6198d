// ABOUTME: Custom serde deserializers for profile fields.
// ABOUTME: Validates image tags and references at load time.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::Profile;
use crate::types::{ImageRef, ImageTag};

pub fn deserialize_image_tag<'de, D>(deserializer: D) -> Result<ImageTag, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageTag::new(&s).map_err(|e| serde::de::Error::custom(format!("image_tag '{s}': {e}")))
}

pub fn deserialize_image_ref<'de, D>(deserializer: D) -> Result<ImageRef, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageRef::parse(&s).map_err(|e| serde::de::Error::custom(format!("base_image '{s}': {e}")))
}

pub fn deserialize_profiles<'de, D>(deserializer: D) -> Result<NonEmpty<Profile>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let profiles: Vec<Profile> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(profiles)
        .ok_or_else(|| serde::de::Error::custom("at least one profile is required"))
}
