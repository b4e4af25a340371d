//! Stable exit codes for the harness CLI.

/// Run completed. Collaborator failures never change this.
pub const OK: i32 = 0;
/// Invalid config, unreadable working directory, or other harness-level errors.
pub const INVALID: i32 = 1;
