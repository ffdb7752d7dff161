use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tacbot_bt::{BtNode, Condition, Parallel, Sequence, TreeRunner};
use tacbot_core::{Blackboard, TickContext, WorldMut, WorldView};

#[derive(Default)]
struct World;

impl WorldView for World {
    type Actor = u64;
}

impl WorldMut for World {}

fn always_true(_ctx: &TickContext, _agent: u64, _world: &World, _bb: &Blackboard) -> bool {
    true
}

fn conditions(n: usize) -> Vec<Box<dyn BtNode<World>>> {
    (0..n)
        .map(|_| Box::new(Condition::new("always", always_true)) as Box<dyn BtNode<World>>)
        .collect()
}

fn bench_bt_tick(c: &mut Criterion) {
    let agent = 1u64;

    let mut sequence = TreeRunner::new(Box::new(Sequence::new(conditions(32))));
    let mut parallel = TreeRunner::new(Box::new(Parallel::new(conditions(32))));
    let mut world = World;
    let mut bb = Blackboard::new();

    let mut tick: u64 = 0;
    c.bench_function("tacbot-bt/sequence(conditions=32)", |b| {
        b.iter(|| {
            let ctx = TickContext {
                tick,
                dt_seconds: 1.0 / 60.0,
                seed: 0,
            };
            black_box(sequence.tick(&ctx, agent, &mut world, &mut bb).ok());
            tick = tick.wrapping_add(1);
        })
    });

    c.bench_function("tacbot-bt/parallel(conditions=32)", |b| {
        b.iter(|| {
            let ctx = TickContext {
                tick,
                dt_seconds: 1.0 / 60.0,
                seed: 0,
            };
            black_box(parallel.tick(&ctx, agent, &mut world, &mut bb).ok());
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_bt_tick);
criterion_main!(benches);
