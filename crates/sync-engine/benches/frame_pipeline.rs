use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sync_engine::{JointPair, Landmark, NoopListener, Stream, SyncConfig, SyncController};

fn pose(offset: f32) -> Vec<Landmark> {
    (0..33)
        .map(|i| {
            let t = i as f32 * 0.1 + offset;
            Landmark::new(t.cos(), t.sin(), t * 0.01)
        })
        .collect()
}

fn bench_process_frame(c: &mut Criterion) {
    let pairs = vec![
        JointPair::new(12, 14),
        JointPair::new(14, 16),
        JointPair::new(11, 13),
        JointPair::new(13, 15),
        JointPair::new(24, 26),
        JointPair::new(23, 25),
    ];
    let mut controller = SyncController::new(SyncConfig::lenient(), NoopListener);
    controller.start_session(pairs, 0).ok();

    let reference = pose(0.0);
    let live = pose(0.05);
    controller.process_frame(Stream::Reference, &reference, 0);

    let mut now = 0u64;
    c.bench_function("process_frame_six_pairs", |b| {
        b.iter(|| {
            now += 33;
            controller.process_frame(Stream::Live, black_box(&live), now)
        })
    });
}

criterion_group!(benches, bench_process_frame);
criterion_main!(benches);
