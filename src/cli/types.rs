//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::answers::AnswersArgs;
use crate::cli::commands::record::RecordArgs;
use crate::cli::commands::report::ReportArgs;
use crate::cli::commands::stats::StatsArgs;

#[derive(Parser, Debug)]
#[command(name = "exploration-stats")]
#[command(about = "State-hit analytics and improvable-state ranking for explorations", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .exploration-stats/config.yaml)
    #[arg(short, long, global = true, env = "EXPLORATION_STATS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record learner interaction events
    Record(RecordArgs),
    /// Inspect counters of one state
    Stats(StatsArgs),
    /// List, clear or resolve unresolved answers
    Answers(AnswersArgs),
    /// Rank the states that most need author attention
    Report(ReportArgs),
}
