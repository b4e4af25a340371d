//! Test-only helpers for fixture directories and scripted collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::collaborator::Collaborator;
use crate::io::fixtures::Fixture;

/// Temporary working directory populated with fixture files.
pub struct FixtureDir {
    temp: TempDir,
}

impl FixtureDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file into the directory and return its path.
    pub fn fixture(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write an executable `sh` script standing in for the collaborator.
    #[cfg(unix)]
    pub fn tool_script(&self, name: &str, body: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.fixture(name, &format!("#!/bin/sh\n{body}\n"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("chmod {}", path.display()))?;
        Ok(path)
    }

    /// Sorted names of every entry in the directory.
    pub fn entries(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.temp.path()).context("read temp dir")? {
            let entry = entry.context("read entry")?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

/// Collaborator that replays canned output per fixture name.
///
/// Fixtures without a script produce no output.
#[derive(Default)]
pub struct ScriptedCollaborator {
    outputs: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(mut self, fixture: &str, lines: &[&str]) -> Self {
        self.outputs.insert(
            fixture.to_string(),
            lines.iter().map(|line| line.to_string()).collect(),
        );
        self
    }

    pub fn fail(mut self, fixture: &str, message: &str) -> Self {
        self.failures
            .insert(fixture.to_string(), message.to_string());
        self
    }

    /// Fixture names in the order they were executed.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Collaborator for ScriptedCollaborator {
    fn reconstruct(&self, _workdir: &Path, fixture: &Fixture) -> Result<Vec<String>> {
        self.calls.borrow_mut().push(fixture.name.clone());
        if let Some(message) = self.failures.get(&fixture.name) {
            return Err(anyhow!("{message}"));
        }
        Ok(self.outputs.get(&fixture.name).cloned().unwrap_or_default())
    }
}
