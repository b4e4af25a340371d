//! I/O helpers for the harness.

pub mod collaborator;
pub mod config;
pub mod fixtures;
pub mod process;
