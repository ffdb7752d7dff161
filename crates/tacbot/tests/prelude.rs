#![cfg(feature = "full")]

use glam::Vec3;
use tacbot::agent::sandbox::SandboxWorld;
use tacbot::prelude::*;

#[test]
fn prelude_drives_a_bot_against_the_sandbox() {
    let mut world = SandboxWorld::new(2000.0);
    world.spawn_pawn(1, Team(0), Vec3::ZERO);
    world.spawn_pawn(2, Team(1), Vec3::new(400.0, 0.0, 0.0));

    let mut bot = BotController::new(1, BotConfig::default()).expect("default config is valid");
    bot.blackboard_mut().set(TRACE_LOG, TraceLog::default());
    let ctx = TickContext {
        tick: 0,
        dt_seconds: 0.1,
        seed: 5,
    };
    bot.enable(&ctx);

    assert_eq!(bot.tick(&ctx, &mut world), Some(NodeResult::Running));
    assert_eq!(bot.current_target(), Some(2));
    let log = bot.blackboard().get(TRACE_LOG).expect("trace log");
    assert_eq!(log.first_tick("combat.start"), Some(0));
}

#[cfg(feature = "serde")]
#[test]
fn trace_log_serializes_through_the_umbrella() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(3, "target.acquired").with_subject(2));
    let json = serde_json::to_string(&log).expect("serialize");
    let back: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, log);
}
