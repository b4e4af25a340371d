//! Collapse the run log into report groups.
//!
//! Adjacent blocks merge while the earlier block produced no output: their
//! fixture names accumulate onto the next marker line. A block with output
//! closes the group. Trailing empty blocks form a final group with no lines.

use crate::core::report::LineFilter;
use crate::core::types::{Block, Report, ReportGroup};

pub fn collapse(blocks: &[Block], filter: &LineFilter) -> Report {
    let mut groups = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for block in blocks {
        pending.push(block.fixture.clone());
        if block.is_empty() {
            continue;
        }
        let lines = block
            .output
            .iter()
            .filter(|line| filter.keeps(line))
            .cloned()
            .collect();
        groups.push(ReportGroup {
            fixtures: std::mem::take(&mut pending),
            lines,
        });
    }

    if !pending.is_empty() {
        groups.push(ReportGroup {
            fixtures: pending,
            lines: Vec::new(),
        });
    }

    Report { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::DEFAULT_LINE_PATTERN;

    fn block(name: &str, output: &[&str]) -> Block {
        Block::new(name, output.iter().map(|s| s.to_string()).collect())
    }

    fn test_filter() -> LineFilter {
        LineFilter::new(DEFAULT_LINE_PATTERN).expect("filter")
    }

    fn fixtures(report: &Report) -> Vec<Vec<&str>> {
        report
            .groups
            .iter()
            .map(|g| g.fixtures.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn no_blocks_yields_empty_report() {
        let report = collapse(&[], &test_filter());
        assert!(report.is_empty());
    }

    #[test]
    fn empty_block_merges_into_next_marker() {
        let blocks = vec![
            block("a_test.py", &[]),
            block("b_test.py", &["TEST b passed"]),
        ];
        let report = collapse(&blocks, &test_filter());
        assert_eq!(fixtures(&report), vec![vec!["a_test.py", "b_test.py"]]);
        assert_eq!(report.groups[0].lines, vec!["TEST b passed"]);
    }

    #[test]
    fn trailing_empty_block_keeps_its_marker() {
        let blocks = vec![
            block("f1", &[]),
            block("f2", &["TEST PASSED"]),
            block("f3", &[]),
        ];
        let report = collapse(&blocks, &test_filter());
        assert_eq!(fixtures(&report), vec![vec!["f1", "f2"], vec!["f3"]]);
        assert!(report.groups[1].lines.is_empty());
    }

    #[test]
    fn runs_of_empty_blocks_merge_repeatedly() {
        let blocks = vec![
            block("a", &[]),
            block("b", &[]),
            block("c", &[]),
            block("d", &["TEST PASSED"]),
        ];
        let report = collapse(&blocks, &test_filter());
        assert_eq!(fixtures(&report), vec![vec!["a", "b", "c", "d"]]);
    }

    #[test]
    fn unreported_output_still_prevents_merge() {
        let blocks = vec![
            block("a", &["## formula ##", ""]),
            block("b", &["TEST PASSED"]),
        ];
        let report = collapse(&blocks, &test_filter());
        assert_eq!(fixtures(&report), vec![vec!["a"], vec!["b"]]);
        assert!(report.groups[0].lines.is_empty());
        assert_eq!(report.groups[1].lines, vec!["TEST PASSED"]);
    }

    #[test]
    fn preserves_block_order() {
        let blocks = vec![
            block("z", &["TEST z"]),
            block("a", &["TEST a"]),
            block("m", &["TEST m"]),
        ];
        let report = collapse(&blocks, &test_filter());
        assert_eq!(fixtures(&report), vec![vec!["z"], vec!["a"], vec!["m"]]);
    }
}
