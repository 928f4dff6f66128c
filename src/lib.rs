//! Exploration Stats - learner interaction analytics for explorations
//!
//! Counts how often learners enter each state of an exploration, which rule
//! handled their answers, and which answers no rule handled. From those
//! counters it ranks the states that most need author attention.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, classification and the `CounterStore` port
//! - **Adapters** (`adapters`): In-memory and SQLite counter stores
//! - **Service Layer** (`services`): Event recording, stats queries, improvability ranking
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging, content loading
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use exploration_stats::adapters::memory::InMemoryCounterStore;
//! use exploration_stats::domain::models::{Exploration, StateDefinition};
//! use exploration_stats::services::{EventRecorder, ImprovabilityAnalyzer};
//!
//! # async fn run() -> exploration_stats::DomainResult<()> {
//! let store = Arc::new(InMemoryCounterStore::new());
//! let recorder = EventRecorder::new(Arc::clone(&store));
//! recorder.record_state_hit("eid", "Intro").await?;
//!
//! let exploration = Exploration::new("eid").with_state(StateDefinition::with_default_rule("Intro"));
//! let report = ImprovabilityAnalyzer::new(store)
//!     .top_ten_improvable_states(&[exploration])
//!     .await?;
//! # let _ = report;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AnswerTally, Config, Exploration, ImprovableStateReport, ImprovementType, RuleHitRecord,
    RuleSignature, StateCounts, StateDefinition, StateKey,
};
pub use domain::ports::CounterStore;
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{EventRecorder, ImprovabilityAnalyzer, StatsService};
