//! Run orchestration: scan, execute each fixture in turn, collapse.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::collapse::collapse;
use crate::core::report::LineFilter;
use crate::core::selection::FixturePredicate;
use crate::core::types::{Block, Report, RunLog};
use crate::io::collaborator::{Collaborator, ProcessCollaborator};
use crate::io::config::HarnessConfig;
use crate::io::fixtures::{Fixture, discover_fixtures};

/// Execute every fixture in order and record one block per fixture.
///
/// Collaborator errors are folded into the block as a single line labelled
/// with `label`; they never stop the run.
#[instrument(skip_all, fields(fixtures = fixtures.len()))]
pub fn execute_fixtures<C: Collaborator + ?Sized>(
    workdir: &Path,
    fixtures: &[Fixture],
    collaborator: &C,
    label: &str,
) -> RunLog {
    let mut log = RunLog::new();
    for fixture in fixtures {
        debug!(fixture = %fixture.name, "executing fixture");
        let output = match collaborator.reconstruct(workdir, fixture) {
            Ok(lines) => lines,
            Err(err) => {
                warn!(fixture = %fixture.name, err = %format!("{err:#}"), "collaborator failed");
                vec![format!("{label}: {err:#}")]
            }
        };
        debug!(fixture = %fixture.name, lines = output.len(), "fixture finished");
        log.append(Block::new(fixture.name.clone(), output));
    }
    log
}

/// Full cycle against an arbitrary predicate and collaborator.
#[instrument(skip_all, fields(workdir = %workdir.display()))]
pub fn run_with<P, C>(
    workdir: &Path,
    predicate: &P,
    sorted: bool,
    collaborator: &C,
    label: &str,
    filter: &LineFilter,
) -> Result<Report>
where
    P: FixturePredicate + ?Sized,
    C: Collaborator + ?Sized,
{
    info!("scanning for fixtures");
    let fixtures = discover_fixtures(workdir, predicate, sorted).context("select fixtures")?;
    info!(count = fixtures.len(), "fixtures selected");

    let log = execute_fixtures(workdir, &fixtures, collaborator, label);

    info!(blocks = log.len(), "collapsing run log");
    let report = collapse(log.blocks(), filter);
    info!(groups = report.groups.len(), "run complete");
    Ok(report)
}

/// Full cycle using the process collaborator described by `config`.
pub fn run_harness(workdir: &Path, config: &HarnessConfig) -> Result<Report> {
    config.validate()?;
    let predicate = config.selection.filter();
    let filter = config.report.line_filter()?;
    let collaborator = ProcessCollaborator::new(config.collaborator.clone());
    run_with(
        workdir,
        &predicate,
        config.selection.sorted,
        &collaborator,
        collaborator.program(),
        &filter,
    )
}
