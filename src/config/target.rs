// ABOUTME: CLI target selector: every profile, or one profile or image reference.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    All,
    Named(String),
}

impl Target {
    pub fn is_single(&self) -> bool {
        matches!(self, Target::Named(_))
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(Target::All);
        }
        Ok(Target::Named(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str("all"),
            Target::Named(name) => f.write_str(name),
        }
    }
}
