//! Batch harness that drives an external reconstruction tool over fixture files.
//!
//! Each fixture in a directory is handed to the `reconstruct` collaborator in
//! turn; the captured output is folded into an ordered run log and collapsed
//! into a diff-friendly report. The crate is split the same way throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (fixture predicate, collapse,
//!   report rendering). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, directory scanning,
//!   process execution). The collaborator sits behind a trait so tests can
//!   script it.
//!
//! [`run`] coordinates the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
