//! Improvability analyzer.
//!
//! Ranks the states of a set of explorations by how much author attention
//! their interaction data suggests. Each state is classified from a
//! per-state counter snapshot; no cross-state snapshot is taken.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    classify, AnalyticsConfig, ClassificationInput, Exploration, ImprovableStateReport, RankOrder,
};
use crate::domain::ports::CounterStore;

/// Report size used when the caller does not pick one.
pub const DEFAULT_REPORT_LIMIT: usize = 10;

pub struct ImprovabilityAnalyzer<S: CounterStore + ?Sized> {
    store: Arc<S>,
    default_limit: usize,
    order: RankOrder,
}

impl<S: CounterStore + ?Sized> ImprovabilityAnalyzer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            default_limit: DEFAULT_REPORT_LIMIT,
            order: RankOrder::Ascending,
        }
    }

    pub fn with_config(mut self, config: &AnalyticsConfig) -> Self {
        self.default_limit = config.report_limit;
        self.order = config.rank_order;
        self
    }

    pub fn with_order(mut self, order: RankOrder) -> Self {
        self.order = order;
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Top states by rank, truncated to the configured limit.
    pub async fn top_improvable_states(
        &self,
        explorations: &[Exploration],
    ) -> DomainResult<Vec<ImprovableStateReport>> {
        self.get_top_improvable_states(explorations, self.default_limit).await
    }

    pub async fn top_ten_improvable_states(
        &self,
        explorations: &[Exploration],
    ) -> DomainResult<Vec<ImprovableStateReport>> {
        self.get_top_improvable_states(explorations, DEFAULT_REPORT_LIMIT).await
    }

    /// Classify every state of every exploration and return at most `limit`
    /// flagged states ordered by rank.
    ///
    /// All content is validated before any counter is read. Equal ranks keep
    /// content order (exploration order, then state order).
    pub async fn get_top_improvable_states(
        &self,
        explorations: &[Exploration],
        limit: usize,
    ) -> DomainResult<Vec<ImprovableStateReport>> {
        for exploration in explorations {
            exploration.validate()?;
        }

        let mut flagged = Vec::new();
        let mut scanned = 0usize;

        for exploration in explorations {
            for state in &exploration.states {
                scanned += 1;
                let key = exploration.state_key(state)?;
                let counts = self.store.state_counts(&key).await?;

                if counts.total_hits == 0 {
                    continue;
                }

                // TODO: decide whether Default rules with different destinations
                // should be ranked separately instead of summed.
                if state.default_rule_count() > 1 || counts.default_signature_count() > 1 {
                    warn!(
                        exploration_id = %exploration.id,
                        state_id = %state.id,
                        "state has several Default rules; summing their hits"
                    );
                }

                let classification = classify(ClassificationInput {
                    total_hits: counts.total_hits,
                    default_rule_hits: counts.default_rule_hits(),
                    has_non_default_rules: state.has_non_default_rules(),
                    incomplete_count: counts.incomplete_count(),
                    recorded_rule_hits: counts.recorded_rule_hits(),
                });

                if let Some((improvement_type, rank)) = classification.flag() {
                    flagged.push(ImprovableStateReport {
                        exp_id: exploration.id.clone(),
                        exploration_title: exploration.title.clone(),
                        state_id: state.id.clone(),
                        improvement_type,
                        rank,
                    });
                }
            }
        }

        let flagged_count = flagged.len();
        // sort_by is stable, so ties stay in accumulation order.
        match self.order {
            RankOrder::Ascending => flagged.sort_by(|a, b| a.rank.cmp(&b.rank)),
            RankOrder::Descending => flagged.sort_by(|a, b| b.rank.cmp(&a.rank)),
        }
        flagged.truncate(limit);

        info!(
            explorations = explorations.len(),
            states_scanned = scanned,
            states_flagged = flagged_count,
            returned = flagged.len(),
            "improvable states ranked"
        );

        Ok(flagged)
    }
}
