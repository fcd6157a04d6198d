// ABOUTME: Profile store: loads build profiles from imgprobe.yml or the bundled list.
// ABOUTME: Resolves a CLI target into the ordered profiles to probe.

mod deserialize;
mod target;

pub use target::Target;

use crate::error::ConfigError;
use crate::runtime::RuntimeConfig;
use crate::types::{ImageRef, ImageTag};
use deserialize::{deserialize_image_ref, deserialize_image_tag, deserialize_profiles};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "imgprobe.yml";
pub const CONFIG_FILENAME_ALT: &str = "imgprobe.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".imgprobe/profiles.yml";

/// Command run in the container when neither an override nor a profile
/// command is available.
pub const DEFAULT_COMMAND: &str = "cat /etc/os-release";

const BUNDLED_PROFILES: &str = include_str!("default_profiles.yml");

/// One base image to build and probe.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    #[serde(deserialize_with = "deserialize_image_tag")]
    pub image_tag: ImageTag,

    #[serde(deserialize_with = "deserialize_image_ref")]
    pub base_image: ImageRef,

    /// Rendered as `RUN` lines, in order.
    #[serde(default)]
    pub commands: Vec<String>,

    /// Informational only.
    #[serde(default)]
    pub package_manager: Option<String>,
}

impl Profile {
    pub fn ad_hoc(image_tag: ImageTag, base_image: ImageRef) -> Self {
        Self {
            image_tag,
            base_image,
            commands: Vec::new(),
            package_manager: None,
        }
    }

    /// First command worth running on its own: not blank, not a comment.
    pub fn first_command(&self) -> Option<&str> {
        self.commands
            .iter()
            .map(|c| c.trim())
            .find(|c| !c.is_empty() && !c.starts_with('#'))
    }
}

/// The parsed configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSet {
    #[serde(default)]
    pub default_command: Option<String>,

    #[serde(default)]
    pub engine: RuntimeConfig,

    #[serde(deserialize_with = "deserialize_profiles")]
    pub profiles: NonEmpty<Profile>,
}

/// Where a profile set was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    File(PathBuf),
    Bundled,
}

impl std::fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileSource::File(path) => write!(f, "{}", path.display()),
            ProfileSource::Bundled => f.write_str("bundled profiles"),
        }
    }
}

impl ProfileSet {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let set: Self = serde_yaml::from_str(yaml)?;
        set.warn_duplicate_tags();
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Yaml(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// The list compiled into the binary.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml(BUNDLED_PROFILES)
    }

    /// Look for a configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load from an explicit path, else a file discovered in `dir`, else the
    /// bundled list.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<(Self, ProfileSource), ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok((Self::load(path)?, ProfileSource::File(path.to_path_buf())));
        }

        match Self::discover(dir) {
            Some(path) => Ok((Self::load(&path)?, ProfileSource::File(path))),
            None => Ok((Self::bundled()?, ProfileSource::Bundled)),
        }
    }

    pub fn default_command(&self) -> &str {
        self.default_command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COMMAND)
    }

    /// Resolve a target into the profiles to run, in document order.
    ///
    /// A selector matching no profile tag is treated as an ad hoc base image
    /// when it looks like an image reference, and rejected otherwise.
    pub fn select(
        &self,
        target: &Target,
        custom_name: Option<&str>,
    ) -> Result<Vec<Profile>, ConfigError> {
        let custom_tag = custom_name.map(custom_image_tag).transpose()?;

        let selector = match target {
            Target::All => {
                if let Some(tag) = custom_tag {
                    tracing::debug!(name = %tag, "custom name ignored when probing all profiles");
                }
                return Ok(self.profiles.iter().cloned().collect());
            }
            Target::Named(selector) => selector,
        };

        if let Some(profile) = self
            .profiles
            .iter()
            .find(|p| p.image_tag.as_str() == selector.as_str())
        {
            let mut profile = profile.clone();
            if let Some(tag) = custom_tag {
                profile.image_tag = tag;
            }
            return Ok(vec![profile]);
        }

        if !ImageRef::looks_like_reference(selector) {
            return Err(ConfigError::UnknownProfile(selector.clone()));
        }

        let base_image = ImageRef::parse(selector).map_err(|source| ConfigError::InvalidImage {
            input: selector.clone(),
            source,
        })?;
        let image_tag = match custom_tag {
            Some(tag) => tag,
            None => ImageTag::derive(selector).map_err(|source| ConfigError::InvalidTag {
                input: selector.clone(),
                source,
            })?,
        };

        Ok(vec![Profile::ad_hoc(image_tag, base_image)])
    }

    fn warn_duplicate_tags(&self) {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if !seen.insert(profile.image_tag.as_str()) {
                tracing::warn!(tag = %profile.image_tag, "duplicate image tag in profile list");
            }
        }
    }
}

/// `--name` values are restricted to letters and digits.
fn custom_image_tag(name: &str) -> Result<ImageTag, ConfigError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidName(name.to_string()));
    }
    ImageTag::new(&name.to_ascii_lowercase()).map_err(|_| ConfigError::InvalidName(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(commands: &[&str]) -> Profile {
        Profile {
            image_tag: ImageTag::new("t").unwrap(),
            base_image: ImageRef::parse("alpine").unwrap(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
            package_manager: None,
        }
    }

    #[test]
    fn first_command_skips_blanks_and_comments() {
        let p = profile(&["  ", "# refresh index", "apk update"]);
        assert_eq!(p.first_command(), Some("apk update"));
    }

    #[test]
    fn first_command_none_when_empty() {
        assert_eq!(profile(&[]).first_command(), None);
    }

    #[test]
    fn custom_name_is_lowercased() {
        assert_eq!(custom_image_tag("MyImage2").unwrap().as_str(), "myimage2");
    }

    #[test]
    fn custom_name_rejects_punctuation() {
        assert!(matches!(
            custom_image_tag("my_image"),
            Err(ConfigError::InvalidName(_))
        ));
    }
}
