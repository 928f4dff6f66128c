//! Stats commands: inspect the counters of one state.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::AppContext;
use crate::cli::output::{base_table, output, truncate, CommandOutput};
use crate::domain::models::{RuleHitRecord, RuleSignature};
use crate::services::StateSummary;

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommands,
}

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Show hit, rule and unresolved-answer counts of a state
    Show {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
        /// Number of unresolved answers to include (defaults to analytics.top_answers)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Show the most recent audit records of a rule
    RuleLog {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
        /// Rule name
        #[arg(long)]
        rule: String,
        /// Destination state of the rule
        #[arg(long)]
        dest: String,
        /// Maximum number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct StateSummaryOutput {
    #[serde(flatten)]
    pub summary: StateSummary,
}

impl CommandOutput for StateSummaryOutput {
    fn to_human(&self) -> String {
        let s = &self.summary;
        let mut lines = vec![format!("State {}/{}", s.exploration_id, s.state_id)];
        lines.push(format!("  Total hits:         {}", s.total_hits));
        lines.push(format!("  Default rule hits:  {}", s.default_rule_hits));
        lines.push(format!("  Incomplete:         {}", s.incomplete_count));

        if s.rules.is_empty() {
            lines.push("\nNo rule matches recorded.".to_string());
        } else {
            let mut table = base_table(&["RULE", "DESTINATION", "HITS"]);
            for entry in &s.rules {
                table.add_row(vec![
                    Cell::new(&entry.rule.name),
                    Cell::new(&entry.rule.dest),
                    Cell::new(entry.hits),
                ]);
            }
            lines.push(format!("\n{table}"));
        }

        if !s.top_unresolved_answers.is_empty() {
            let mut table = base_table(&["UNRESOLVED ANSWER", "COUNT"]);
            for (answer, count) in &s.top_unresolved_answers {
                table.add_row(vec![Cell::new(truncate(answer, 60)), Cell::new(count)]);
            }
            lines.push(format!("\n{table}"));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RuleLogOutput {
    pub rule: RuleSignature,
    pub records: Vec<RuleHitRecord>,
    pub total: usize,
}

impl CommandOutput for RuleLogOutput {
    fn to_human(&self) -> String {
        if self.records.is_empty() {
            return format!("No audit records for rule {}.", self.rule);
        }

        let mut table = base_table(&["RECORDED AT", "EXTRA INFO", "ID"]);
        for record in &self.records {
            table.add_row(vec![
                Cell::new(record.recorded_at.format("%Y-%m-%d %H:%M:%S")),
                Cell::new(truncate(&record.extra_info, 40)),
                Cell::new(&record.id.to_string()[..8]),
            ]);
        }
        format!("Showing {} record(s) for rule {}:\n{table}", self.total, self.rule)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: StatsArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match args.command {
        StatsCommands::Show {
            exploration_id,
            state_id,
            top,
        } => output(&show(ctx, &exploration_id, &state_id, top).await?, json_mode),
        StatsCommands::RuleLog {
            exploration_id,
            state_id,
            rule,
            dest,
            limit,
        } => {
            let rule = RuleSignature::new(rule, dest);
            output(&rule_log(ctx, &exploration_id, &state_id, rule, limit).await?, json_mode);
        }
    }

    Ok(())
}

pub async fn show(
    ctx: &AppContext,
    exploration_id: &str,
    state_id: &str,
    top: Option<usize>,
) -> Result<StateSummaryOutput> {
    let n = top.unwrap_or(ctx.config.analytics.top_answers);
    let summary = ctx.stats().state_summary(exploration_id, state_id, n).await?;
    Ok(StateSummaryOutput { summary })
}

pub async fn rule_log(
    ctx: &AppContext,
    exploration_id: &str,
    state_id: &str,
    rule: RuleSignature,
    limit: usize,
) -> Result<RuleLogOutput> {
    let records = ctx
        .stats()
        .rule_hit_records(exploration_id, state_id, &rule, limit)
        .await?;
    let total = records.len();
    Ok(RuleLogOutput { rule, records, total })
}
