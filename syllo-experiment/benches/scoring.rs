use criterion::{Criterion, black_box, criterion_group, criterion_main};
use syllo_core::{Conclusion, Judgment, PhaseKind, StimulusItem};
use syllo_experiment::{StimulusSequence, score};

fn answered_sequence(n: usize) -> StimulusSequence<()> {
    let items = (0..n)
        .map(|i| StimulusItem::Conclusion(Conclusion::new((), i % 3 != 0)))
        .collect();
    let mut seq = StimulusSequence::from_items(PhaseKind::Conclusion, items);
    let mut now = 0u64;
    while !seq.is_complete() {
        seq.mark_displayed(now);
        now += 350_000_000 + (seq.cursor() as u64 % 7) * 50_000_000;
        let judgment = if seq.cursor() % 2 == 0 {
            Judgment::Valid
        } else {
            Judgment::Invalid
        };
        seq.record_judgment(judgment, now);
    }
    seq
}

pub fn bench_score(c: &mut Criterion) {
    let mut g = c.benchmark_group("score");
    g.sample_size(60);

    for n in [32usize, 1_000, 100_000] {
        let seq = answered_sequence(n);
        g.bench_function(format!("conclusions_{n}"), |b| {
            b.iter(|| score(black_box(seq.conclusions())))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
