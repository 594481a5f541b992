//! Sampling cost of staggered timelines, the shape every section reveal uses.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use folio_motion::{
    AnimationStep, Easing, ElementId, Inputs, MotionContext, Playhead, Prop, PropSet, Timeline,
    Value,
};

fn stagger_timeline(n: u32) -> Timeline {
    let targets: Vec<ElementId> = (0..n).map(ElementId).collect();
    Timeline::builder()
        .step(
            AnimationStep::from_to(
                targets.clone(),
                PropSet::new()
                    .with(Prop::Opacity, 0.0)
                    .with(Prop::Y, 40.0)
                    .with(Prop::Scale, 0.95),
                PropSet::new()
                    .with(Prop::Opacity, 1.0)
                    .with(Prop::Y, 0.0)
                    .with(Prop::Scale, 1.0),
                500.0,
            )
            .ease(Easing::Back(1.4, folio_motion::EaseDir::Out))
            .stagger(100.0),
        )
        .build()
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline_sample");
    for n in [6u32, 24, 96] {
        let tl = stagger_timeline(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tl, |b, tl| {
            let mut head = Playhead::new();
            head.play();
            b.iter(|| {
                if head.advance(tl, 16.0).is_empty() {
                    let out = head.sample(tl, |_, p| p.default_value());
                    black_box(out);
                } else {
                    head.restart();
                }
            });
        });
    }
    group.finish();
}

fn bench_context_frame(c: &mut Criterion) {
    c.bench_function("context_frame_24_targets", |b| {
        let mut ctx = MotionContext::default();
        let scope = ctx.open_scope("bench");
        let keys: Vec<String> = (0..24).map(|i| format!("card.{i}")).collect();
        let targets = ctx.claim_all(scope, &keys);
        let tl = Timeline::from_steps([AnimationStep::to(
            targets,
            PropSet::new().with(Prop::Color, Value::Color([1.0, 0.0, 0.43, 1.0])),
            400.0,
        )
        .stagger(20.0)]);
        let sub = ctx.play(scope, tl);
        let run = ctx.run_of(sub);
        let inputs = Inputs::default();
        b.iter(|| {
            let out = ctx.update(16.0, &inputs);
            black_box(out.changes.len());
            if let Some(run) = run {
                if ctx.run_state(run) == Some(folio_motion::PlayState::Completed) {
                    ctx.apply(run, folio_motion::ToggleAction::Restart);
                }
            }
        });
    });
}

criterion_group!(benches, bench_sample, bench_context_frame);
criterion_main!(benches);
