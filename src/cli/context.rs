//! Wiring of the configured counter store into the services.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::adapters::memory::InMemoryCounterStore;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteCounterStore};
use crate::domain::models::{Config, StorageBackend};
use crate::domain::ports::CounterStore;
use crate::services::{EventRecorder, ImprovabilityAnalyzer, StatsService};

/// Loaded configuration plus the store every command shares.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn CounterStore>,
}

impl AppContext {
    pub async fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn CounterStore> = match config.storage.backend {
            StorageBackend::Sqlite => {
                let url = config.database.url();
                let pool = initialize_database(&url, Some(PoolConfig::from(&config.database)))
                    .await
                    .with_context(|| format!("Failed to open counter database at {}", config.database.path))?;
                debug!(path = %config.database.path, "sqlite counter store ready");
                Arc::new(SqliteCounterStore::new(pool))
            }
            StorageBackend::Memory => {
                debug!("in-memory counter store ready");
                Arc::new(InMemoryCounterStore::new())
            }
        };

        Ok(Self { config, store })
    }

    pub fn recorder(&self) -> EventRecorder<dyn CounterStore> {
        EventRecorder::new(Arc::clone(&self.store))
    }

    pub fn stats(&self) -> StatsService<dyn CounterStore> {
        StatsService::new(Arc::clone(&self.store))
    }

    pub fn analyzer(&self) -> ImprovabilityAnalyzer<dyn CounterStore> {
        ImprovabilityAnalyzer::new(Arc::clone(&self.store)).with_config(&self.config.analytics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_context() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let ctx = AppContext::from_config(config).await.unwrap();
        ctx.recorder().record_state_hit("eid", "Intro").await.unwrap();
        assert_eq!(ctx.stats().count_state_hits("eid", "Intro").await.unwrap(), 1);
        assert_eq!(ctx.analyzer().default_limit(), 10);
    }

    #[tokio::test]
    async fn test_sqlite_backend_context_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("stats.db").to_string_lossy().into_owned();

        let ctx = AppContext::from_config(config).await.unwrap();
        ctx.recorder().record_state_hit("eid", "Intro").await.unwrap();
        assert_eq!(ctx.stats().count_state_hits("eid", "Intro").await.unwrap(), 1);
        assert!(dir.path().join("stats.db").exists());
    }
}
