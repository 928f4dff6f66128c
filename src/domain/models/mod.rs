pub mod config;
pub mod counts;
pub mod exploration;
pub mod report;
pub mod rule;
pub mod state_key;

pub use config::{
    AnalyticsConfig, Config, DatabaseConfig, LoggingConfig, RankOrder, StorageBackend,
    StorageConfig,
};
pub use counts::{AnswerTally, RuleHitRecord, StateCounts};
pub use exploration::{Exploration, StateDefinition};
pub use report::{
    classify, Classification, ClassificationInput, ImprovableStateReport, ImprovementType,
};
pub use rule::{RuleSignature, DEFAULT_RULE_NAME};
pub use state_key::{StateKey, MAX_ID_LEN};
