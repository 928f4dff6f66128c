use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

use exploration_stats::adapters::memory::InMemoryCounterStore;
use exploration_stats::domain::models::{
    classify, ClassificationInput, Exploration, RuleSignature, StateDefinition,
};
use exploration_stats::services::{EventRecorder, ImprovabilityAnalyzer};

fn build_explorations(count: usize, states_per_exploration: usize) -> Vec<Exploration> {
    (0..count)
        .map(|e| {
            (0..states_per_exploration).fold(Exploration::new(format!("exp-{e}")), |exp, s| {
                let state_id = format!("state-{s}");
                exp.with_state(StateDefinition::with_rules(
                    state_id.clone(),
                    vec![
                        RuleSignature::new("Equals", "End"),
                        RuleSignature::default_rule(state_id),
                    ],
                ))
            })
        })
        .collect()
}

async fn seeded_store(explorations: &[Exploration]) -> Arc<InMemoryCounterStore> {
    let store = Arc::new(InMemoryCounterStore::new());
    let recorder = EventRecorder::new(Arc::clone(&store));

    for exploration in explorations {
        for (i, state) in exploration.states.iter().enumerate() {
            let default = RuleSignature::default_rule(state.id.clone());
            for _ in 0..(i % 7) + 1 {
                recorder.record_state_hit(&exploration.id, &state.id).await.unwrap();
            }
            for _ in 0..(i % 3) {
                recorder
                    .record_rule_hit(&exploration.id, &state.id, &default, "")
                    .await
                    .unwrap();
            }
        }
    }
    store
}

fn bench_classify(c: &mut Criterion) {
    let input = ClassificationInput {
        total_hits: 40,
        default_rule_hits: 12,
        has_non_default_rules: true,
        incomplete_count: 20,
        recorded_rule_hits: 20,
    };
    c.bench_function("classify", |b| b.iter(|| classify(black_box(input))));
}

fn bench_top_improvable_states(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("top_improvable_states");

    for (explorations, states) in [(1, 20), (10, 20), (50, 40)] {
        let content = build_explorations(explorations, states);
        let store = rt.block_on(seeded_store(&content));
        let analyzer = ImprovabilityAnalyzer::new(store);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{explorations}x{states}")),
            &content,
            |b, content| {
                b.to_async(&rt)
                    .iter(|| async { analyzer.top_ten_improvable_states(black_box(content)).await.unwrap() });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_top_improvable_states);
criterion_main!(benches);
