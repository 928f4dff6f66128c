//! SQLite implementation of the CounterStore.
//!
//! Every increment is a single upsert statement, so SQLite serializes
//! concurrent writers on the same row without lost updates. Multi-row writes
//! (tally replacement, rule hit plus audit row) run in one transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AnswerTally, RuleHitRecord, RuleSignature, StateCounts, StateKey};
use crate::domain::ports::CounterStore;

#[derive(Clone)]
pub struct SqliteCounterStore {
    pool: SqlitePool,
}

impl SqliteCounterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn to_sql_count(value: u64) -> DomainResult<i64> {
    i64::try_from(value)
        .map_err(|_| DomainError::SerializationError(format!("count {value} exceeds SQLite range")))
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    async fn increment_state_hits(&self, key: &StateKey) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO state_hits (exploration_id, state_id, hit_count, updated_at)
               VALUES (?, ?, 1, ?)
               ON CONFLICT (exploration_id, state_id)
               DO UPDATE SET hit_count = hit_count + 1, updated_at = excluded.updated_at"#
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_rule_hit(&self, record: &RuleHitRecord) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO rule_hits (exploration_id, state_id, rule_name, rule_dest, hit_count, updated_at)
               VALUES (?, ?, ?, ?, 1, ?)
               ON CONFLICT (exploration_id, state_id, rule_name, rule_dest)
               DO UPDATE SET hit_count = hit_count + 1, updated_at = excluded.updated_at"#
        )
        .bind(&record.key.exploration_id)
        .bind(&record.key.state_id)
        .bind(&record.rule.name)
        .bind(&record.rule.dest)
        .bind(record.recorded_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO rule_hit_log (id, exploration_id, state_id, rule_name, rule_dest, extra_info, recorded_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(record.id.to_string())
        .bind(&record.key.exploration_id)
        .bind(&record.key.state_id)
        .bind(&record.rule.name)
        .bind(&record.rule.dest)
        .bind(&record.extra_info)
        .bind(record.recorded_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn increment_unresolved_answer(&self, key: &StateKey, answer: &str) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO unresolved_answers (exploration_id, state_id, answer, frequency)
               VALUES (?, ?, ?, 1)
               ON CONFLICT (exploration_id, state_id, answer)
               DO UPDATE SET frequency = frequency + 1"#
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .bind(answer)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_unresolved_answers(&self, key: &StateKey, tally: &AnswerTally) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM unresolved_answers WHERE exploration_id = ? AND state_id = ?")
            .bind(&key.exploration_id)
            .bind(&key.state_id)
            .execute(&mut *tx)
            .await?;

        for (answer, frequency) in tally.iter().filter(|(_, count)| **count > 0) {
            sqlx::query(
                "INSERT INTO unresolved_answers (exploration_id, state_id, answer, frequency) VALUES (?, ?, ?, ?)"
            )
            .bind(&key.exploration_id)
            .bind(&key.state_id)
            .bind(answer)
            .bind(to_sql_count(*frequency)?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_unresolved_answers(&self, key: &StateKey, answers: &[String]) -> DomainResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for answer in answers {
            let result = sqlx::query(
                "DELETE FROM unresolved_answers WHERE exploration_id = ? AND state_id = ? AND answer = ?"
            )
            .bind(&key.exploration_id)
            .bind(&key.state_id)
            .bind(answer)
            .execute(&mut *tx)
            .await?;
            removed += result.rows_affected();
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn count_state_hits(&self, key: &StateKey) -> DomainResult<u64> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT hit_count FROM state_hits WHERE exploration_id = ? AND state_id = ?"
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map_or(0, |(count,)| to_count(count)))
    }

    async fn count_rule_hits(&self, key: &StateKey, rule: &RuleSignature) -> DomainResult<u64> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"SELECT hit_count FROM rule_hits
               WHERE exploration_id = ? AND state_id = ? AND rule_name = ? AND rule_dest = ?"#
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .bind(&rule.name)
        .bind(&rule.dest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map_or(0, |(count,)| to_count(count)))
    }

    async fn get_unresolved_answers(&self, key: &StateKey) -> DomainResult<AnswerTally> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT answer, frequency FROM unresolved_answers WHERE exploration_id = ? AND state_id = ?"
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(answer, frequency)| (answer, to_count(frequency)))
            .collect())
    }

    async fn state_counts(&self, key: &StateKey) -> DomainResult<StateCounts> {
        // One read transaction so hits and rule counters come from the same snapshot.
        let mut tx = self.pool.begin().await?;

        let hits: Option<(i64,)> = sqlx::query_as(
            "SELECT hit_count FROM state_hits WHERE exploration_id = ? AND state_id = ?"
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .fetch_optional(&mut *tx)
        .await?;

        let rules: Vec<(String, String, i64)> = sqlx::query_as(
            r#"SELECT rule_name, rule_dest, hit_count FROM rule_hits
               WHERE exploration_id = ? AND state_id = ?
               ORDER BY rule_name, rule_dest"#
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StateCounts {
            total_hits: hits.map_or(0, |(count,)| to_count(count)),
            rule_hits: rules
                .into_iter()
                .map(|(name, dest, count)| (RuleSignature::new(name, dest), to_count(count)))
                .collect(),
        })
    }

    async fn rule_hit_records(
        &self,
        key: &StateKey,
        rule: &RuleSignature,
        limit: usize,
    ) -> DomainResult<Vec<RuleHitRecord>> {
        let rows: Vec<RuleHitRow> = sqlx::query_as(
            r#"SELECT id, extra_info, recorded_at FROM rule_hit_log
               WHERE exploration_id = ? AND state_id = ? AND rule_name = ? AND rule_dest = ?
               ORDER BY recorded_at DESC, rowid DESC
               LIMIT ?"#
        )
        .bind(&key.exploration_id)
        .bind(&key.state_id)
        .bind(&rule.name)
        .bind(&rule.dest)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> DomainResult<RuleHitRecord> {
                Ok(RuleHitRecord {
                    id: super::parse_uuid(&row.id)?,
                    key: key.clone(),
                    rule: rule.clone(),
                    extra_info: row.extra_info,
                    recorded_at: super::parse_datetime(&row.recorded_at)?,
                })
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct RuleHitRow {
    id: String,
    extra_info: String,
    recorded_at: String,
}
