// ABOUTME: Output formatting for probe results and CLI feedback.
// ABOUTME: Results go to stdout as JSON, tables, or plain text; progress goes to stderr.

mod table;

use crate::probe::{ProbeOutcome, RunResult};
use std::fmt::Write as _;
use std::io::Write as _;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One summary line per profile, output indented below it.
    Plain,
    /// A key/value table per profile.
    Table,
    /// A JSON array, or a single object for a single target.
    Json { pretty: bool },
}

impl ReportFormat {
    /// `--json` wins; `--pretty` alone selects tables and indents JSON otherwise.
    pub fn from_flags(json: bool, pretty: bool) -> Self {
        match (json, pretty) {
            (true, pretty) => ReportFormat::Json { pretty },
            (false, true) => ReportFormat::Table,
            (false, false) => ReportFormat::Plain,
        }
    }
}

/// Handles CLI output based on the configured format.
pub struct Output {
    format: ReportFormat,
    show_progress: bool,
}

impl Output {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            show_progress: true,
        }
    }

    /// An output that prints nothing but the report.
    pub fn silent(format: ReportFormat) -> Self {
        Self {
            format,
            show_progress: false,
        }
    }

    /// Print a progress message to stderr.
    pub fn progress(&self, message: &str) {
        if self.show_progress {
            eprintln!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if self.show_progress {
            eprintln!("Warning: {message}");
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("Error: {message}");
    }

    /// Render outcomes in the configured format. Pure: the same input always
    /// yields the same text.
    ///
    /// `single` marks a run that targeted one profile; JSON output is then a
    /// bare object rather than an array.
    pub fn render(&self, outcomes: &[ProbeOutcome], single: bool) -> serde_json::Result<String> {
        match self.format {
            ReportFormat::Json { pretty } => render_json(outcomes, single, pretty),
            ReportFormat::Table => Ok(outcomes
                .iter()
                .map(table::render_outcome)
                .collect::<Vec<_>>()
                .join("\n")),
            ReportFormat::Plain => Ok(render_plain(outcomes)),
        }
    }

    /// Write the rendered report to stdout.
    pub fn report(&self, outcomes: &[ProbeOutcome], single: bool) -> std::io::Result<()> {
        let text = self.render(outcomes, single).map_err(std::io::Error::other)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }
}

fn render_json(outcomes: &[ProbeOutcome], single: bool, pretty: bool) -> serde_json::Result<String> {
    match (single, outcomes) {
        (true, [only]) if pretty => serde_json::to_string_pretty(only),
        (true, [only]) => serde_json::to_string(only),
        _ if pretty => serde_json::to_string_pretty(outcomes),
        _ => serde_json::to_string(outcomes),
    }
}

fn render_plain(outcomes: &[ProbeOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        match outcome {
            ProbeOutcome::Passed(result) => write_plain_result(&mut out, result),
            ProbeOutcome::Failed(failure) => {
                let _ = writeln!(
                    out,
                    "✗ {}: {} failed: {}",
                    failure.image_tag, failure.stage, failure.error
                );
            }
        }
    }
    let passed = outcomes.iter().filter(|o| !o.is_failure()).count();
    let _ = write!(out, "{passed}/{} profile(s) passed", outcomes.len());
    out
}

fn write_plain_result(out: &mut String, result: &RunResult) {
    let _ = writeln!(
        out,
        "✓ {}: {} ({}) exited with {}",
        result.image_tag,
        result.name,
        result.id.short(),
        result.exit_code
    );
    let _ = writeln!(out, "  $ {}", display_command(&result.command));
    for line in result.stdout.lines() {
        let _ = writeln!(out, "  {line}");
    }
    for line in result.stderr.lines() {
        let _ = writeln!(out, "  ! {line}");
    }
}

/// Shell-quoted form of an argv, for display only.
pub fn display_command(argv: &[String]) -> String {
    shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" "))
}
