//! Benchmarks for inference, edit closure and layout.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use regula::atom::Atom;
use regula::closure;
use regula::infer::InferenceEngine;
use regula::kb::KnowledgeBase;
use regula::layout::layout;
use regula::rule::Rule;

const INPUTS: usize = 64;
const LAYERS: usize = 8;
const RULES_PER_LAYER: usize = 32;

/// A layered rule base: each rule draws 2-4 premises from the inputs and the
/// conclusions of earlier layers, so declaration order is layout-safe.
fn layered_kb(rng: &mut StdRng) -> KnowledgeBase {
    let mut names: Vec<String> = (0..INPUTS).map(|i| format!("in{i}")).collect();
    let mut kb = KnowledgeBase::new();
    for layer in 0..LAYERS {
        let mut produced = Vec::with_capacity(RULES_PER_LAYER);
        for r in 0..RULES_PER_LAYER {
            let label = format!("L{layer}_{r}");
            let count = rng.gen_range(2..=4);
            let premises: Vec<Atom> = (0..count)
                .map(|_| {
                    let name = &names[rng.gen_range(0..names.len())];
                    Atom::new(name, rng.gen_bool(0.25)).unwrap()
                })
                .collect();
            let rule = Rule::new(premises, Atom::positive(&label).unwrap()).unwrap();
            kb.append(rule).unwrap();
            produced.push(label);
        }
        names.extend(produced);
    }
    kb
}

fn seeds(rng: &mut StdRng) -> Vec<Atom> {
    (0..INPUTS)
        .filter(|_| rng.gen_bool(0.5))
        .map(|i| Atom::positive(&format!("in{i}")).unwrap())
        .collect()
}

fn bench_infer(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let kb = layered_kb(&mut rng);
    let initial = seeds(&mut rng);
    let engine = InferenceEngine::default();

    c.bench_function("infer_256_rules", |bench| {
        bench.iter(|| black_box(engine.infer(&kb, initial.iter().cloned())))
    });
}

fn bench_closure(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let kb = layered_kb(&mut rng);

    c.bench_function("remove_variable_256_rules", |bench| {
        bench.iter_batched(
            || kb.clone(),
            |mut kb| black_box(closure::remove_variable(&mut kb, "in0")),
            BatchSize::SmallInput,
        )
    });
}

fn bench_layout(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let kb = layered_kb(&mut rng);

    c.bench_function("layout_256_rules", |bench| {
        bench.iter(|| black_box(layout(&kb)))
    });
}

criterion_group!(benches, bench_infer, bench_closure, bench_layout);
criterion_main!(benches);
