//! Fixture discovery in the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::core::selection::FixturePredicate;

/// A selected fixture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Display name used on marker lines.
    pub name: String,
    /// Path relative to the working directory, passed to the collaborator.
    pub path: PathBuf,
}

/// Scan `dir` (non-recursively) for files accepted by `predicate`.
///
/// Returns fixtures in directory enumeration order unless `sorted` is set.
/// Files that cannot be read are skipped with a warning.
#[instrument(skip_all, fields(dir = %dir.display(), sorted))]
pub fn discover_fixtures<P: FixturePredicate + ?Sized>(
    dir: &Path,
    predicate: &P,
    sorted: bool,
) -> Result<Vec<Fixture>> {
    let mut fixtures = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.context("read dir entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy().into_owned();
        if !predicate.accepts_name(&name) {
            continue;
        }
        let contents = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = %name, err = %err, "skipping unreadable file");
                continue;
            }
        };
        if !predicate.accepts_contents(&String::from_utf8_lossy(&contents)) {
            continue;
        }
        debug!(file = %name, "fixture selected");
        fixtures.push(Fixture {
            name,
            path: PathBuf::from(file_name),
        });
    }
    if sorted {
        fixtures.sort_by(|left, right| left.name.cmp(&right.name));
    }
    Ok(fixtures)
}
