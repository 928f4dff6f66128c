//! Answers commands: review and resolve answers no rule handled.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::AppContext;
use crate::cli::output::{base_table, output, truncate, CommandOutput};
use crate::domain::models::AnswerTally;

#[derive(Args, Debug)]
pub struct AnswersArgs {
    #[command(subcommand)]
    pub command: AnswersCommands,
}

#[derive(Subcommand, Debug)]
pub enum AnswersCommands {
    /// List unresolved answers, most frequent first
    List {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
        /// Only show the N most frequent answers
        #[arg(long)]
        top: Option<usize>,
    },
    /// Forget every unresolved answer of a state
    Clear {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
    },
    /// Remove answers that a new rule now handles
    Resolve {
        /// Exploration ID
        exploration_id: String,
        /// State ID
        state_id: String,
        /// Answers to remove
        #[arg(required = true)]
        answers: Vec<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct AnswerEntry {
    pub answer: String,
    pub count: u64,
}

#[derive(Debug, serde::Serialize)]
pub struct AnswerListOutput {
    pub exploration_id: String,
    pub state_id: String,
    pub answers: Vec<AnswerEntry>,
    pub total: usize,
}

impl CommandOutput for AnswerListOutput {
    fn to_human(&self) -> String {
        if self.answers.is_empty() {
            return format!("No unresolved answers for {}/{}.", self.exploration_id, self.state_id);
        }

        let mut table = base_table(&["ANSWER", "COUNT"]);
        for entry in &self.answers {
            table.add_row(vec![Cell::new(truncate(&entry.answer, 60)), Cell::new(entry.count)]);
        }
        format!(
            "Showing {} unresolved answer(s) for {}/{}:\n{table}",
            self.total, self.exploration_id, self.state_id
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AnswerChangeOutput {
    pub success: bool,
    pub exploration_id: String,
    pub state_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<u64>,
}

impl CommandOutput for AnswerChangeOutput {
    fn to_human(&self) -> String {
        match self.removed {
            Some(removed) => format!(
                "Resolved {} answer(s) for {}/{}",
                removed, self.exploration_id, self.state_id
            ),
            None => format!("Cleared unresolved answers for {}/{}", self.exploration_id, self.state_id),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AnswersArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match args.command {
        AnswersCommands::List {
            exploration_id,
            state_id,
            top,
        } => output(&list(ctx, exploration_id, state_id, top).await?, json_mode),
        AnswersCommands::Clear {
            exploration_id,
            state_id,
        } => output(&clear(ctx, exploration_id, state_id).await?, json_mode),
        AnswersCommands::Resolve {
            exploration_id,
            state_id,
            answers,
        } => output(&resolve(ctx, exploration_id, state_id, &answers).await?, json_mode),
    }

    Ok(())
}

/// Unresolved answers, most frequent first; `top` of `None` lists them all.
pub async fn list(
    ctx: &AppContext,
    exploration_id: String,
    state_id: String,
    top: Option<usize>,
) -> Result<AnswerListOutput> {
    let answers: Vec<AnswerEntry> = ctx
        .stats()
        .top_unresolved_answers(&exploration_id, &state_id, top.unwrap_or(usize::MAX))
        .await?
        .into_iter()
        .map(|(answer, count)| AnswerEntry { answer, count })
        .collect();
    let total = answers.len();
    Ok(AnswerListOutput {
        exploration_id,
        state_id,
        answers,
        total,
    })
}

pub async fn clear(ctx: &AppContext, exploration_id: String, state_id: String) -> Result<AnswerChangeOutput> {
    ctx.recorder()
        .replace_unresolved_answers(&exploration_id, &state_id, &AnswerTally::new())
        .await?;
    Ok(AnswerChangeOutput {
        success: true,
        exploration_id,
        state_id,
        removed: None,
    })
}

pub async fn resolve(
    ctx: &AppContext,
    exploration_id: String,
    state_id: String,
    answers: &[String],
) -> Result<AnswerChangeOutput> {
    let removed = ctx
        .recorder()
        .resolve_answers(&exploration_id, &state_id, answers)
        .await?;
    Ok(AnswerChangeOutput {
        success: true,
        exploration_id,
        state_id,
        removed: Some(removed),
    })
}
