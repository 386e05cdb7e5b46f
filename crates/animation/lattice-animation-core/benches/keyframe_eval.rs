use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice_animation_core::{
    evaluate_property, AnimatableProperty, EvaluatorConfig, KeyframeEvaluator,
};
use lattice_test_fixtures::properties;

fn bench_eval(c: &mut Criterion) {
    let props: Vec<AnimatableProperty> = properties::keys()
        .iter()
        .map(|k| properties::load(k).expect("fixture"))
        .collect();

    c.bench_function("uncached_sweep", |b| {
        b.iter(|| {
            for p in &props {
                for f in 0..120 {
                    black_box(evaluate_property(p, f as f64).expect("finite"));
                }
            }
        })
    });

    c.bench_function("cached_sweep", |b| {
        let mut eval = KeyframeEvaluator::new(EvaluatorConfig::default());
        b.iter(|| {
            for p in &props {
                for f in 0..120 {
                    black_box(eval.evaluate(p, f as f64).expect("finite"));
                }
            }
        })
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
