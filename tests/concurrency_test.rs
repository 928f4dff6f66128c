//! Concurrent recording must not lose increments, and replacing a tally must
//! not interleave with increments of the same state.

mod common;

use std::sync::Arc;

use exploration_stats::adapters::sqlite::{initialize_database, PoolConfig, SqliteCounterStore};
use exploration_stats::domain::models::{AnswerTally, RuleSignature};
use exploration_stats::services::{EventRecorder, StatsService};
use exploration_stats::CounterStore;

const TASKS: usize = 8;
const EVENTS_PER_TASK: usize = 25;

async fn record_concurrently(store: Arc<dyn CounterStore>) {
    let recorder = EventRecorder::new(store);
    let rule = RuleSignature::default_rule("Intro");

    let mut handles = Vec::new();
    for task in 0..TASKS {
        let recorder = recorder.clone();
        let rule = rule.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..EVENTS_PER_TASK {
                recorder.record_state_hit("eid", "Intro").await.unwrap();
                recorder
                    .record_rule_hit("eid", "Intro", &rule, &format!("{task}-{i}"))
                    .await
                    .unwrap();
                recorder
                    .record_unresolved_answer("eid", "Intro", "same answer")
                    .await
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

async fn assert_totals(store: Arc<dyn CounterStore>, backend: &str) {
    let stats = StatsService::new(store);
    let expected = (TASKS * EVENTS_PER_TASK) as u64;

    assert_eq!(stats.count_state_hits("eid", "Intro").await.unwrap(), expected, "{backend}");
    assert_eq!(
        stats
            .count_rule_hits("eid", "Intro", &RuleSignature::default_rule("Intro"))
            .await
            .unwrap(),
        expected,
        "{backend}"
    );
    let answers = stats.get_unresolved_answers("eid", "Intro").await.unwrap();
    assert_eq!(answers.get("same answer"), Some(&expected), "{backend}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_store_concurrent_recording() {
    let store = common::memory_store();
    record_concurrently(Arc::clone(&store)).await;
    assert_totals(store, "memory").await;
}

/// Increment "x" and "z" from several tasks while one task replaces the tally
/// with `{x: 100, y: 7}` halfway through.
async fn replace_while_recording(store: Arc<dyn CounterStore>) {
    let recorder = EventRecorder::new(store);

    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let recorder = recorder.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..EVENTS_PER_TASK {
                recorder.record_unresolved_answer("eid", "Intro", "x").await.unwrap();
                recorder.record_unresolved_answer("eid", "Intro", "z").await.unwrap();
                tokio::task::yield_now().await;
            }
        }));
    }

    let replacer = recorder.clone();
    handles.push(tokio::spawn(async move {
        for _ in 0..EVENTS_PER_TASK / 2 {
            tokio::task::yield_now().await;
        }
        let tally: AnswerTally = [("x".to_string(), 100), ("y".to_string(), 7)].into_iter().collect();
        replacer
            .replace_unresolved_answers("eid", "Intro", &tally)
            .await
            .unwrap();
    }));

    for handle in handles {
        handle.await.unwrap();
    }
}

/// The replacement lands atomically at one point in the increment stream:
/// everything before it is discarded, everything after it is kept.
async fn assert_replacement_is_atomic(store: Arc<dyn CounterStore>, backend: &str) {
    let stats = StatsService::new(store);
    let increments = (TASKS * EVENTS_PER_TASK) as u64;
    let answers = stats.get_unresolved_answers("eid", "Intro").await.unwrap();

    assert!(
        answers.keys().all(|answer| ["x", "y", "z"].contains(&answer.as_str())),
        "{backend}: unexpected answers {answers:?}"
    );
    assert!(answers.values().all(|count| *count > 0), "{backend}: zero entry in {answers:?}");
    assert_eq!(answers.get("y"), Some(&7), "{backend}");

    let x = answers.get("x").copied().unwrap_or(0);
    assert!((100..=100 + increments).contains(&x), "{backend}: x = {x}");

    let z = answers.get("z").copied().unwrap_or(0);
    assert!(z <= increments, "{backend}: z = {z}");
    // x and z are incremented in lockstep per task, so the post-replace
    // share of each differs by at most one per task.
    assert!((x - 100).abs_diff(z) <= TASKS as u64, "{backend}: x = {x}, z = {z}");
}

async fn file_sqlite_store(dir: &tempfile::TempDir) -> Arc<dyn CounterStore> {
    let url = format!("sqlite:{}", dir.path().join("stats.db").display());
    let pool = initialize_database(
        &url,
        Some(PoolConfig {
            max_connections: 4,
            ..PoolConfig::default()
        }),
    )
    .await
    .unwrap();
    Arc::new(SqliteCounterStore::new(pool))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_file_store_concurrent_recording() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_sqlite_store(&dir).await;

    record_concurrently(Arc::clone(&store)).await;
    assert_totals(store, "sqlite").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_store_replace_during_recording() {
    let store = common::memory_store();
    replace_while_recording(Arc::clone(&store)).await;
    assert_replacement_is_atomic(store, "memory").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_file_store_replace_during_recording() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_sqlite_store(&dir).await;

    replace_while_recording(Arc::clone(&store)).await;
    assert_replacement_is_atomic(store, "sqlite").await;
}

#[tokio::test]
async fn test_sqlite_counters_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("stats.db").display());

    {
        let pool = initialize_database(&url, None).await.unwrap();
        let recorder = EventRecorder::new(Arc::new(SqliteCounterStore::new(pool.clone())));
        recorder.record_state_hit("eid", "Intro").await.unwrap();
        recorder.record_state_hit("eid", "Intro").await.unwrap();
        pool.close().await;
    }

    let pool = initialize_database(&url, None).await.unwrap();
    let stats = StatsService::new(Arc::new(SqliteCounterStore::new(pool)));
    assert_eq!(stats.count_state_hits("eid", "Intro").await.unwrap(), 2);
}
