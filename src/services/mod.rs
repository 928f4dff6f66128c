pub mod event_recorder;
pub mod improvability_analyzer;
pub mod stats_service;

pub use event_recorder::EventRecorder;
pub use improvability_analyzer::{ImprovabilityAnalyzer, DEFAULT_REPORT_LIMIT};
pub use stats_service::{RuleBreakdown, StateSummary, StatsService};
