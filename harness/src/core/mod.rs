//! Pure harness logic: no filesystem or process access.

pub mod collapse;
pub mod report;
pub mod selection;
pub mod types;
