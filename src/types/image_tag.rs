// ABOUTME: Validated local image tag used to name profiles, images, and Dockerfiles.
// ABOUTME: Restricted to characters the engine accepts in a repository name.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ImageTagError {
    #[error("image tag cannot be empty")]
    Empty,

    #[error("image tag exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("image tag must start with a letter or digit")]
    BadStart,

    #[error("image tag must be lowercase")]
    NotLowercase,

    #[error("invalid character in image tag: {0:?}")]
    InvalidChar(char),
}

/// Name of a profile. Doubles as the local image repository name and the
/// `Dockerfile.<tag>` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(value: &str) -> Result<Self, ImageTagError> {
        let first = value.chars().next().ok_or(ImageTagError::Empty)?;

        if value.len() > MAX_LEN {
            return Err(ImageTagError::TooLong);
        }

        if !first.is_ascii_alphanumeric() {
            return Err(ImageTagError::BadStart);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ImageTagError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !"_.-".contains(c) {
                return Err(ImageTagError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Derive a tag from arbitrary text by keeping only ASCII alphanumerics
    /// and lowercasing them. `python:3.12-slim` becomes `python312slim`.
    pub fn derive(source: &str) -> Result<Self, ImageTagError> {
        let slug: String = source
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::new(&slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
