//! Record commands: feed learner interaction events into the counter store.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::RuleSignature;

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommands,
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Record that a learner entered a state
    StateHit {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
    },
    /// Record that a learner's answer matched a rule
    RuleHit {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
        /// Rule name (use "Default" for the fallback rule)
        #[arg(long)]
        rule: String,
        /// Destination state of the rule
        #[arg(long)]
        dest: String,
        /// Free-form context kept with the audit record
        #[arg(long, default_value = "")]
        extra: String,
    },
    /// Record an answer that no rule handled
    Answer {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
        /// Raw answer text
        answer: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct RecordOutput {
    pub success: bool,
    pub event: &'static str,
    pub exploration_id: String,
    pub state_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleSignature>,
}

impl CommandOutput for RecordOutput {
    fn to_human(&self) -> String {
        match self.rule {
            Some(ref rule) => format!(
                "Recorded {} for {}/{} ({})",
                self.event, self.exploration_id, self.state_id, rule
            ),
            None => format!("Recorded {} for {}/{}", self.event, self.exploration_id, self.state_id),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RecordArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let recorder = ctx.recorder();

    let out = match args.command {
        RecordCommands::StateHit {
            exploration_id,
            state_id,
        } => {
            recorder.record_state_hit(&exploration_id, &state_id).await?;
            RecordOutput {
                success: true,
                event: "state hit",
                exploration_id,
                state_id,
                rule: None,
            }
        }
        RecordCommands::RuleHit {
            exploration_id,
            state_id,
            rule,
            dest,
            extra,
        } => {
            let rule = RuleSignature::new(rule, dest);
            recorder
                .record_rule_hit(&exploration_id, &state_id, &rule, &extra)
                .await?;
            RecordOutput {
                success: true,
                event: "rule hit",
                exploration_id,
                state_id,
                rule: Some(rule),
            }
        }
        RecordCommands::Answer {
            exploration_id,
            state_id,
            answer,
        } => {
            recorder
                .record_unresolved_answer(&exploration_id, &state_id, &answer)
                .await?;
            RecordOutput {
                success: true,
                event: "unresolved answer",
                exploration_id,
                state_id,
                rule: None,
            }
        }
    };

    output(&out, json_mode);
    Ok(())
}
