//! Two bots in the sandbox arena, one hidden behind a wall at the start.
//!
//! Run:
//! `RUST_LOG=tacbot_agent=debug cargo run -p tacbot-agent --example skirmish`

use glam::Vec3;
use tacbot_agent::sandbox::SandboxWorld;
use tacbot_agent::{BotConfig, BotController, Team};
use tacbot_core::TickContext;
use tacbot_tools::{TraceLog, TRACE_LOG};
use tracing_subscriber::{fmt, EnvFilter};

const DT: f32 = 0.05;
const TICKS: u64 = 600;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut world = SandboxWorld::new(1500.0);
    world.spawn_pawn(1, Team(0), Vec3::new(-500.0, 0.0, 0.0));
    world.spawn_pawn(2, Team(1), Vec3::new(500.0, 300.0, 0.0));
    world.add_wall(Vec3::new(-60.0, 100.0, 0.0), Vec3::new(60.0, 600.0, 0.0), 300.0);

    let mut bots = Vec::new();
    for id in [1, 2] {
        let mut bot = match BotController::new(id, BotConfig::default()) {
            Ok(bot) => bot,
            Err(err) => {
                eprintln!("bot {id}: {err}");
                return;
            }
        };
        bot.blackboard_mut().set(TRACE_LOG, TraceLog::default());
        bot.enable(&TickContext {
            tick: 0,
            dt_seconds: DT,
            seed: 1,
        });
        bots.push(bot);
    }

    for tick in 0..TICKS {
        let ctx = TickContext {
            tick,
            dt_seconds: DT,
            seed: 1,
        };
        for bot in bots.iter_mut() {
            bot.tick(&ctx, &mut world);
        }
        world.step(DT);
    }

    for bot in &bots {
        let id = bot.agent();
        println!("bot {id}: {} shots", world.shots_by(id));
        if let Some(log) = bot.blackboard().get(TRACE_LOG) {
            for event in log.events.iter().filter(|e| !e.tag.starts_with("shoot")) {
                println!(
                    "  t={:>6.2}s {:<20} subject={}",
                    event.tick as f32 * DT,
                    event.tag,
                    event.subject
                );
            }
        }
    }
}
