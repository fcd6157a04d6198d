// ABOUTME: Two-column key/value tables for --pretty output.

use super::display_command;
use crate::probe::{ProbeFailure, ProbeOutcome, RunResult};

pub(super) fn render_outcome(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Passed(result) => render(result.image_tag.as_str(), &result_rows(result)),
        ProbeOutcome::Failed(failure) => render(&failure.image_tag, &failure_rows(failure)),
    }
}

fn result_rows(result: &RunResult) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("id", result.id.to_string()),
        ("name", result.name.clone()),
        ("command", display_command(&result.command)),
        ("stdout", result.stdout.clone()),
        ("stderr", result.stderr.clone()),
        ("exit code", result.exit_code.to_string()),
    ];
    if let Some(ref image) = result.image {
        rows.push(("image", image.id.short().to_string()));
        rows.push(("platform", format!("{}/{}", image.os, image.architecture)));
        rows.push(("size", format!("{:.1} MB", image.size_mb())));
    }
    rows
}

fn failure_rows(failure: &ProbeFailure) -> Vec<(&'static str, String)> {
    vec![
        ("stage", failure.stage.to_string()),
        ("error", failure.error.clone()),
    ]
}

/// Draw the table. Multi-line values continue on rows with an empty key.
fn render(title: &str, rows: &[(&str, String)]) -> String {
    let lines: Vec<(&str, Vec<String>)> = rows
        .iter()
        .map(|(key, value)| (*key, split_value(value)))
        .collect();

    let key_width = lines
        .iter()
        .map(|(key, _)| key.chars().count())
        .chain(std::iter::once("container".len()))
        .max()
        .unwrap_or(0);
    let value_width = lines
        .iter()
        .flat_map(|(_, values)| values.iter().map(|v| v.chars().count()))
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);

    let border = format!("+{}+{}+", "-".repeat(key_width + 2), "-".repeat(value_width + 2));
    let row = |key: &str, value: &str| {
        format!(
            "| {key}{} | {value}{} |",
            " ".repeat(key_width - key.chars().count()),
            " ".repeat(value_width - value.chars().count())
        )
    };

    let mut out = vec![border.clone(), row("container", title), border.clone()];
    for (key, values) in &lines {
        for (i, value) in values.iter().enumerate() {
            out.push(row(if i == 0 { *key } else { "" }, value));
        }
    }
    out.push(border);
    out.join("\n")
}

fn split_value(value: &str) -> Vec<String> {
    let lines: Vec<String> = value.lines().map(|l| l.replace('\t', "    ")).collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_line_up() {
        let rows = vec![("id", "abc".to_string()), ("stdout", "hi".to_string())];
        let table = render("alpine_latest", &rows);
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{table}");
        assert!(table.contains("| container | alpine_latest |"));
    }

    #[test]
    fn multiline_value_spans_rows() {
        let rows = vec![("stdout", "one\ntwo".to_string())];
        let table = render("t", &rows);
        assert!(table.contains("| stdout    | one |"), "{table}");
        assert!(table.contains("|           | two |"), "{table}");
    }

    #[test]
    fn empty_value_keeps_its_row() {
        let rows = vec![("stderr", String::new())];
        let table = render("t", &rows);
        assert!(table.contains("| stderr "));
    }
}
