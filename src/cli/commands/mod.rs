//! Subcommand implementations.

pub mod answers;
pub mod record;
pub mod report;
pub mod stats;
