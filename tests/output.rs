// ABOUTME: Integration tests for report rendering.
// ABOUTME: Checks JSON shape and key order, tables, and plain summaries.

use imgprobe::output::{Output, ReportFormat};
use imgprobe::probe::{ProbeFailure, ProbeOutcome, RunResult, Stage};
use imgprobe::types::{ContainerId, ImageTag};

fn passed(tag: &str, stdout: &str) -> ProbeOutcome {
    ProbeOutcome::Passed(RunResult {
        id: ContainerId::new(format!("cid_{tag}")),
        name: format!("imgprobe_{tag}_1700000000"),
        command: vec!["echo".to_string(), "hi".to_string()],
        stdout: stdout.to_string(),
        stderr: String::new(),
        image_tag: ImageTag::new(tag).unwrap(),
        exit_code: 0,
        image: None,
    })
}

fn failed(tag: &str) -> ProbeOutcome {
    ProbeOutcome::Failed(ProbeFailure {
        image_tag: tag.to_string(),
        stage: Stage::Build,
        error: "build of x failed: exit 127".to_string(),
    })
}

fn render(format: ReportFormat, outcomes: &[ProbeOutcome], single: bool) -> String {
    Output::silent(format).render(outcomes, single).unwrap()
}

mod json {
    use super::*;

    const COMPACT: ReportFormat = ReportFormat::Json { pretty: false };

    #[test]
    fn keys_follow_declared_order() {
        let text = render(COMPACT, &[passed("alpine_latest", "hi")], true);
        assert_eq!(
            text,
            r#"{"id":"cid_alpine_latest","name":"imgprobe_alpine_latest_1700000000","command":["echo","hi"],"stdout":"hi","stderr":""}"#
        );
    }

    #[test]
    fn several_targets_give_an_array() {
        let text = render(COMPACT, &[passed("a", "1"), passed("b", "2")], false);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["stdout"], "1");
        assert_eq!(items[1]["stdout"], "2");
    }

    #[test]
    fn all_with_one_profile_is_still_an_array() {
        let text = render(COMPACT, &[passed("a", "1")], false);
        assert!(text.starts_with('['));
    }

    #[test]
    fn failures_carry_stage_and_error() {
        let text = render(COMPACT, &[passed("a", "1"), failed("b")], false);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["image_tag"], "b");
        assert_eq!(value[1]["stage"], "build");
        assert!(value[1]["error"].as_str().unwrap().contains("127"));
    }

    #[test]
    fn pretty_is_indented() {
        let text = render(
            ReportFormat::Json { pretty: true },
            &[passed("a", "1")],
            true,
        );
        assert!(text.starts_with("{\n  \"id\": \"cid_a\""));
    }

    #[test]
    fn rendering_is_repeatable() {
        let outcomes = [passed("a", "line one\nline two"), failed("b")];
        assert_eq!(
            render(COMPACT, &outcomes, false),
            render(COMPACT, &outcomes, false)
        );
    }
}

mod formats {
    use super::*;

    #[test]
    fn flags_pick_format() {
        assert_eq!(ReportFormat::from_flags(false, false), ReportFormat::Plain);
        assert_eq!(ReportFormat::from_flags(false, true), ReportFormat::Table);
        assert_eq!(
            ReportFormat::from_flags(true, false),
            ReportFormat::Json { pretty: false }
        );
        assert_eq!(
            ReportFormat::from_flags(true, true),
            ReportFormat::Json { pretty: true }
        );
    }

    #[test]
    fn table_is_headed_container() {
        let text = render(ReportFormat::Table, &[passed("alpine_latest", "hi")], true);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("+-"));
        assert!(lines[1].starts_with("| container | alpine_latest"));
        assert!(text.contains("| stdout    | hi"));
        assert!(text.contains("| command   | echo hi"));
    }

    #[test]
    fn table_shows_failures() {
        let text = render(ReportFormat::Table, &[failed("fedora_latest")], true);
        assert!(text.contains("| stage     | build"));
        assert!(text.contains("| container | fedora_latest"));
    }

    #[test]
    fn plain_lists_each_profile() {
        let text = render(
            ReportFormat::Plain,
            &[passed("alpine_latest", "hi"), failed("fedora_latest")],
            false,
        );
        assert!(text.contains("✓ alpine_latest: imgprobe_alpine_latest_1700000000"));
        assert!(text.contains("  $ echo hi\n  hi\n"));
        assert!(text.contains("✗ fedora_latest: build failed"));
        assert!(text.ends_with("1/2 profile(s) passed"));
    }
}
