//! Report command: rank the states that most need author attention.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use std::path::PathBuf;

use crate::cli::context::AppContext;
use crate::cli::output::{base_table, output, CommandOutput};
use crate::domain::models::ImprovableStateReport;
use crate::infrastructure::ExplorationCatalog;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// YAML or JSON file holding the explorations to analyze
    pub content_file: PathBuf,

    /// Maximum number of states to report (defaults to analytics.report_limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct ReportOutput {
    pub states: Vec<ImprovableStateReport>,
    pub total: usize,
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        if self.states.is_empty() {
            return "No improvable states found.".to_string();
        }

        let mut table = base_table(&["EXPLORATION", "STATE", "TYPE", "RANK"]);
        for entry in &self.states {
            let exploration = match entry.exploration_title {
                Some(ref title) => format!("{title} ({})", entry.exp_id),
                None => entry.exp_id.clone(),
            };
            table.add_row(vec![
                Cell::new(exploration),
                Cell::new(&entry.state_id),
                Cell::new(entry.improvement_type),
                Cell::new(entry.rank),
            ]);
        }
        format!("Showing {} improvable state(s):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ReportArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let report = build_report(&args, ctx).await?;
    output(&report, json_mode);
    Ok(())
}

/// Load the content file and rank its states.
pub async fn build_report(args: &ReportArgs, ctx: &AppContext) -> Result<ReportOutput> {
    let explorations = ExplorationCatalog::load_from_file(&args.content_file)
        .with_context(|| format!("Failed to load content from {}", args.content_file.display()))?;

    let analyzer = ctx.analyzer();
    let limit = args.limit.unwrap_or_else(|| analyzer.default_limit());
    let states = analyzer.get_top_improvable_states(&explorations, limit).await?;
    let total = states.len();

    Ok(ReportOutput { states, total })
}
