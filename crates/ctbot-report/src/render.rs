//! Markdown rendering for the bot's pull-request comment.
//!
//! Rendering is pure and deterministic: the reconciler compares rendered
//! bodies byte-for-byte to decide whether a comment write is needed, so the
//! same input must always produce the same output.

use chrono::DateTime;

use crate::report::{TestCase, TestReport};

const COMMENT_FOOTER: &str =
    "---\n_Automated comment from the continuous-testing bot; updated in place on every poll._";

/// Map a status value onto its display glyph.
///
/// Total over all inputs: unrecognized statuses render as `❓` instead of
/// failing the comment.
pub fn status_glyph(status: &str) -> &'static str {
    match status {
        "PASS" => "✅",
        "FAIL" => "❌",
        "ERROR" => "⚠️",
        _ => "❓",
    }
}

/// Format an elapsed duration as `{minutes}m {seconds}s`.
///
/// Only the sub-hour remainder is shown; durations of an hour or more lose
/// the hour component. Known limitation of the published comment format.
pub fn format_duration(total_seconds: i64) -> String {
    let remainder = total_seconds.max(0) % 3_600;
    format!("{}m {}s", remainder / 60, remainder % 60)
}

fn elapsed_seconds(started_at: &str, completed_at: &str) -> Option<i64> {
    let started = DateTime::parse_from_rfc3339(started_at).ok()?;
    let completed = DateTime::parse_from_rfc3339(completed_at).ok()?;
    Some((completed - started).num_seconds().max(0))
}

fn testcase_duration(testcase: &TestCase) -> String {
    match elapsed_seconds(&testcase.started_at, &testcase.completed_at) {
        Some(seconds) => format_duration(seconds),
        None => "?".to_string(),
    }
}

/// Derive the per-testcase log URL from the report's details URL.
///
/// Fixed convention with the artifact store: the report lives at
/// `{base}/{hash}.json` and each testcase log at
/// `{base}/{hash}_{testcase}.txt`.
pub fn testcase_log_url(details_url: &str, testcase: &str) -> String {
    let stem = details_url.strip_suffix(".json").unwrap_or(details_url);
    format!("{stem}_{testcase}.txt")
}

fn comment_header(commit_hash: &str) -> String {
    format!("### 🧪 Continuous testing results for `{commit_hash}`")
}

/// Render the comment body for a published test report.
pub fn render_report_comment(report: &TestReport, details_url: &str) -> String {
    let mut body = comment_header(&report.hash);
    body.push_str("\n\n");
    body.push_str(&format!(
        "**Overall Status:** {} {} ([details]({details_url}))\n\n",
        status_glyph(&report.overall_status),
        report.overall_status
    ));
    body.push_str("| Testcase | Status | Duration | Log |\n");
    body.push_str("|----------|--------|----------|-----|\n");
    for testcase in &report.testcases {
        body.push_str(&format!(
            "| {} | {} {} | {} | [log]({}) |\n",
            testcase.testcase,
            status_glyph(&testcase.status),
            testcase.status,
            testcase_duration(testcase),
            testcase_log_url(details_url, &testcase.testcase)
        ));
    }
    body.push('\n');
    body.push_str(COMMENT_FOOTER);
    body
}

/// Render the comment body shown while no report has been published yet.
pub fn render_pending_comment(commit_hash: &str) -> String {
    format!(
        "{}\n\n**Status:** ⏳ TESTING\n\n{COMMENT_FOOTER}",
        comment_header(commit_hash)
    )
}

#[cfg(test)]
mod tests {
    use super::{
        format_duration, render_pending_comment, render_report_comment, status_glyph,
        testcase_log_url,
    };
    use crate::report::{TestCase, TestReport};

    fn sample_report() -> TestReport {
        TestReport {
            hash: "dcf214c9580ee9212f6dd72678056c24b08f4298".to_string(),
            run_id: "8575942365".to_string(),
            kind: "pull_request".to_string(),
            pull_request: "4536".to_string(),
            started_at: "2024-04-05T21:31:17Z".to_string(),
            completed_at: "2024-04-05T21:35:28Z".to_string(),
            testcases: vec![
                TestCase {
                    testcase: "conf_10k_bintree".to_string(),
                    status: "PASS".to_string(),
                    started_at: "2024-04-05T21:32:25Z".to_string(),
                    completed_at: "2024-04-05T21:33:58Z".to_string(),
                },
                TestCase {
                    testcase: "conf_send_independant".to_string(),
                    status: "FAIL".to_string(),
                    started_at: "2024-04-05T21:32:19Z".to_string(),
                    completed_at: "2024-04-05T21:34:06Z".to_string(),
                },
            ],
            overall_status: "FAIL".to_string(),
        }
    }

    #[test]
    fn unit_status_glyph_is_total_over_unrecognized_statuses() {
        assert_eq!(status_glyph("PASS"), "✅");
        assert_eq!(status_glyph("FAIL"), "❌");
        assert_eq!(status_glyph("ERROR"), "⚠️");
        assert_eq!(status_glyph("SKIPPED"), "❓");
        assert_eq!(status_glyph(""), "❓");
    }

    #[test]
    fn unit_format_duration_truncates_to_sub_hour_remainder() {
        assert_eq!(format_duration(93), "1m 33s");
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(59), "0m 59s");
        // Durations of an hour or more lose the hour component.
        assert_eq!(format_duration(3_600), "0m 0s");
        assert_eq!(format_duration(3_693), "1m 33s");
        // Negative elapsed time clamps to zero.
        assert_eq!(format_duration(-5), "0m 0s");
    }

    #[test]
    fn unit_testcase_log_url_substitutes_json_suffix() {
        assert_eq!(
            testcase_log_url("https://store.example/reports/deadbeef.json", "conf_10k"),
            "https://store.example/reports/deadbeef_conf_10k.txt"
        );
    }

    #[test]
    fn functional_render_report_comment_includes_overall_glyph_and_ordered_rows() {
        let report = sample_report();
        let details_url = "https://store.example/reports/dcf214c9580ee9212f6dd72678056c24b08f4298.json";
        let body = render_report_comment(&report, details_url);

        assert!(body.contains("`dcf214c9580ee9212f6dd72678056c24b08f4298`"));
        assert!(body.contains("**Overall Status:** ❌ FAIL"));
        assert!(body.contains(&format!("([details]({details_url}))")));

        let rows: Vec<&str> = body
            .lines()
            .filter(|line| line.starts_with("| ") && !line.starts_with("| Testcase"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("conf_10k_bintree"));
        assert!(rows[0].contains("✅ PASS"));
        assert!(rows[0].contains("1m 33s"));
        assert!(rows[0].contains(
            "https://store.example/reports/dcf214c9580ee9212f6dd72678056c24b08f4298_conf_10k_bintree.txt"
        ));
        assert!(rows[1].contains("conf_send_independant"));
        assert!(rows[1].contains("❌ FAIL"));
        assert!(rows[1].contains("1m 47s"));
    }

    #[test]
    fn functional_render_report_comment_renders_rows_for_unrecognized_statuses() {
        let mut report = sample_report();
        report.testcases[0].status = "FLAKY".to_string();
        let body = render_report_comment(&report, "https://store.example/r/x.json");
        assert!(body.contains("❓ FLAKY"));
    }

    #[test]
    fn functional_render_pending_comment_has_testing_status_and_no_table() {
        let body = render_pending_comment("deadbeef");
        assert!(body.contains("`deadbeef`"));
        assert!(body.contains("⏳ TESTING"));
        assert!(!body.lines().any(|line| line.starts_with("| ")));
    }

    #[test]
    fn regression_render_report_comment_is_deterministic() {
        let report = sample_report();
        let details_url = "https://store.example/reports/abc.json";
        assert_eq!(
            render_report_comment(&report, details_url),
            render_report_comment(&report, details_url)
        );
    }

    #[test]
    fn regression_unparseable_timestamps_render_placeholder_duration() {
        let mut report = sample_report();
        report.testcases[0].started_at = "not-a-timestamp".to_string();
        let body = render_report_comment(&report, "https://store.example/r/x.json");
        assert!(body.contains("| ? |"));
    }
}
