use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use tacbot_agent::sandbox::SandboxWorld;
use tacbot_agent::{BotConfig, BotController, Team};
use tacbot_core::TickContext;

const DT: f32 = 1.0 / 60.0;

/// Two teams of `per_team` bots facing each other across the arena.
fn skirmish(per_team: u64) -> (SandboxWorld, Vec<BotController<SandboxWorld>>) {
    let mut world = SandboxWorld::new(2000.0);
    let mut bots = Vec::new();
    for i in 0..per_team {
        let y = i as f32 * 120.0 - per_team as f32 * 60.0;
        world.spawn_pawn(i + 1, Team(0), Vec3::new(-600.0, y, 0.0));
        world.spawn_pawn(i + 101, Team(1), Vec3::new(600.0, y, 0.0));
    }
    world.add_wall(Vec3::new(-40.0, -150.0, 0.0), Vec3::new(40.0, 150.0, 0.0), 300.0);

    let ctx = TickContext {
        tick: 0,
        dt_seconds: DT,
        seed: 0,
    };
    for id in (1..=per_team).chain(101..101 + per_team) {
        let mut bot = BotController::new(id, BotConfig::default()).expect("default config");
        bot.enable(&ctx);
        bots.push(bot);
    }
    (world, bots)
}

fn bench_controller_tick(c: &mut Criterion) {
    let (mut world, mut bots) = skirmish(1);
    let mut tick: u64 = 0;
    c.bench_function("tacbot-agent/controller(bots=2)", |b| {
        b.iter(|| {
            let ctx = TickContext {
                tick,
                dt_seconds: DT,
                seed: 0,
            };
            for bot in bots.iter_mut() {
                black_box(bot.tick(&ctx, &mut world));
            }
            world.step(DT);
            tick = tick.wrapping_add(1);
        })
    });

    let (mut world, mut bots) = skirmish(8);
    let mut tick: u64 = 0;
    c.bench_function("tacbot-agent/controller(bots=16)", |b| {
        b.iter(|| {
            let ctx = TickContext {
                tick,
                dt_seconds: DT,
                seed: 0,
            };
            for bot in bots.iter_mut() {
                black_box(bot.tick(&ctx, &mut world));
            }
            world.step(DT);
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_controller_tick);
criterion_main!(benches);
