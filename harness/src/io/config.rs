//! Harness configuration stored in `reconstruct-harness.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::report::{DEFAULT_LINE_PATTERN, DEFAULT_MARKER_PREFIX, LineFilter};
use crate::core::selection::BooleanAssertionFilter;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "reconstruct-harness.toml";

/// Harness configuration (TOML).
///
/// Missing fields default to values that reproduce the plain
/// `reconstruct <fixture>` batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    pub collaborator: CollaboratorConfig,
    pub selection: SelectionConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CollaboratorConfig {
    /// Program and leading arguments; the fixture name is appended.
    pub command: Vec<String>,

    /// `nice -n` adjustment applied on unix. `0` runs the command directly.
    /// Negative values need privileges and are rejected.
    pub niceness: i32,

    /// Truncate stdout/stderr beyond this many bytes per stream.
    pub output_limit_bytes: usize,

    /// Kill the collaborator after this many seconds. Unset waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            command: vec!["reconstruct".to_string()],
            niceness: 19,
            output_limit_bytes: 1_000_000,
            timeout_secs: None,
        }
    }
}

impl CollaboratorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectionConfig {
    /// File extensions (without the dot) eligible as fixtures.
    pub extensions: Vec<String>,

    /// Literal substrings, any of which marks a file as a fixture.
    pub content_markers: Vec<String>,

    /// Sort fixtures by name instead of directory enumeration order.
    pub sorted: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            content_markers: vec!["True,".to_string(), "False,".to_string()],
            sorted: false,
        }
    }
}

impl SelectionConfig {
    pub fn filter(&self) -> BooleanAssertionFilter {
        BooleanAssertionFilter::new(self.extensions.clone(), self.content_markers.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Text placed before the fixture names on each marker line.
    pub marker_prefix: String,

    /// Regex a collaborator line must match to appear in the report.
    pub line_pattern: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            line_pattern: DEFAULT_LINE_PATTERN.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn line_filter(&self) -> Result<LineFilter> {
        LineFilter::new(&self.line_pattern)
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        let collaborator = &self.collaborator;
        if collaborator.command.is_empty() || collaborator.command[0].trim().is_empty() {
            return Err(anyhow!("collaborator.command must be a non-empty array"));
        }
        if !(0..=19).contains(&collaborator.niceness) {
            return Err(anyhow!("collaborator.niceness must be within 0..=19"));
        }
        if collaborator.output_limit_bytes == 0 {
            return Err(anyhow!("collaborator.output_limit_bytes must be > 0"));
        }
        if collaborator.timeout_secs == Some(0) {
            return Err(anyhow!("collaborator.timeout_secs must be > 0"));
        }

        let selection = &self.selection;
        if selection.extensions.is_empty()
            || selection
                .extensions
                .iter()
                .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(anyhow!("selection.extensions must be non-empty strings"));
        }
        if selection.content_markers.is_empty()
            || selection.content_markers.iter().any(String::is_empty)
        {
            return Err(anyhow!("selection.content_markers must be non-empty strings"));
        }

        self.report
            .line_filter()
            .context("report.line_pattern invalid")?;
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `HarnessConfig::default()`.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    if !path.exists() {
        let cfg = HarnessConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HarnessConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, HarnessConfig::default());
        assert_eq!(cfg.collaborator.command, vec!["reconstruct"]);
        assert_eq!(cfg.collaborator.timeout(), None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "[collaborator]\ncommand = [\"python3\", \"reconstruct.py\"]\ntimeout_secs = 30\n\n[selection]\nsorted = true\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.collaborator.command, vec!["python3", "reconstruct.py"]);
        assert_eq!(cfg.collaborator.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.collaborator.niceness, 19);
        assert!(cfg.selection.sorted);
        assert_eq!(cfg.selection.extensions, vec!["py"]);
        assert_eq!(cfg.report, ReportConfig::default());
    }

    #[test]
    fn rejects_empty_command() {
        let mut cfg = HarnessConfig::default();
        cfg.collaborator.command = vec![" ".to_string()];
        let err = cfg.validate().expect_err("empty command");
        assert!(err.to_string().contains("collaborator.command"));
    }

    #[test]
    fn rejects_out_of_range_niceness() {
        let mut cfg = HarnessConfig::default();
        cfg.collaborator.niceness = 20;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_niceness() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[collaborator]\nniceness = -5\n").expect("write");
        let err = load_config(&path).expect_err("negative niceness");
        assert!(format!("{err:#}").contains("collaborator.niceness"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = HarnessConfig::default();
        cfg.collaborator.timeout_secs = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_markers() {
        let mut cfg = HarnessConfig::default();
        cfg.selection.content_markers = vec![String::new()];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_line_pattern() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[report]\nline_pattern = \"(unclosed\"\n").expect("write");
        let err = load_config(&path).expect_err("bad pattern");
        assert!(format!("{err:#}").contains("report.line_pattern"));
    }
}
