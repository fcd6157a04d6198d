// ABOUTME: Effective command selection and tokenization.
// ABOUTME: Also generates time-stamped container names.

use super::error::ProbeError;
use crate::config::Profile;
use crate::types::ImageTag;

/// Characters that only mean something to a shell.
const SHELL_METACHARACTERS: &[char] = &['&', '|', ';', '<', '>', '$', '`'];

/// Override, else the profile's first real command, else the default.
pub fn effective_command<'a>(
    command_override: Option<&'a str>,
    profile: &'a Profile,
    default_command: &'a str,
) -> &'a str {
    command_override
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| profile.first_command())
        .unwrap_or(default_command)
}

/// Split a command line into argv using shell quoting rules.
///
/// Commands relying on shell syntax (chaining, pipes, redirects, expansion)
/// run through `sh -c` instead, since the engine execs argv directly.
pub fn tokenize(command: &str) -> Result<Vec<String>, ProbeError> {
    let command = command.trim();
    if command.contains(SHELL_METACHARACTERS) {
        return Ok(vec!["sh".to_string(), "-c".to_string(), command.to_string()]);
    }

    match shlex::split(command) {
        Some(argv) if !argv.is_empty() => Ok(argv),
        _ => Err(ProbeError::Command(command.to_string())),
    }
}

/// `imgprobe_<tag>_<unix seconds>_<position>`. The 1-based position in the
/// batch keeps names apart when profiles share a tag.
pub fn container_name(tag: &ImageTag, timestamp: i64, position: usize) -> String {
    format!("imgprobe_{tag}_{timestamp}_{position}")
}

/// Drop the trailing newline(s) a command prints after its last line.
pub fn trim_output(text: &str) -> String {
    text.trim_end_matches(['\n', '\r']).to_string()
}
