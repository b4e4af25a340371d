//! Report line filtering and rendering.

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::types::{Report, ReportGroup};

pub const DEFAULT_MARKER_PREFIX: &str = "### ";
pub const DEFAULT_LINE_PATTERN: &str = "TEST";

/// Selects which collaborator lines make it into the report.
#[derive(Debug, Clone)]
pub struct LineFilter {
    pattern: Regex,
}

impl LineFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern =
            Regex::new(pattern).with_context(|| format!("compile report pattern {pattern:?}"))?;
        Ok(Self { pattern })
    }

    pub fn keeps(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Marker line for a group: prefix followed by the merged fixture names.
pub fn marker_line(prefix: &str, group: &ReportGroup) -> String {
    format!("{prefix}{}", group.fixtures.join(" "))
}

/// Render the report as output lines, without trailing newlines.
pub fn render_lines(report: &Report, prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for group in &report.groups {
        lines.push(marker_line(prefix, group));
        lines.extend(group.lines.iter().cloned());
    }
    lines
}

/// Render the report as text: one line per entry, no trailing blank line.
pub fn render_text(report: &Report, prefix: &str) -> String {
    let mut out = String::new();
    for line in render_lines(report, prefix) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(fixtures: &[&str], lines: &[&str]) -> ReportGroup {
        ReportGroup {
            fixtures: fixtures.iter().map(|s| s.to_string()).collect(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn default_filter_matches_test_lines() {
        let filter = LineFilter::new(DEFAULT_LINE_PATTERN).expect("filter");
        assert!(filter.keeps("TEST PASSED"));
        assert!(filter.keeps("*** TEST FAILED ******************"));
        assert!(!filter.keeps("single-head: True"));
        assert!(!filter.keeps(""));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = LineFilter::new("TEST(").expect_err("bad regex");
        assert!(err.to_string().contains("compile report pattern"));
    }

    #[test]
    fn renders_merged_markers_and_lines() {
        let report = Report {
            groups: vec![
                group(&["a_test.py", "b_test.py"], &["TEST b passed"]),
                group(&["c_test.py"], &[]),
            ],
        };
        let text = render_text(&report, DEFAULT_MARKER_PREFIX);
        assert_eq!(
            text,
            "### a_test.py b_test.py\nTEST b passed\n### c_test.py\n"
        );
    }

    #[test]
    fn empty_report_renders_nothing() {
        assert_eq!(render_text(&Report::default(), DEFAULT_MARKER_PREFIX), "");
    }
}
