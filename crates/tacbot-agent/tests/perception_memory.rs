use glam::Vec3;
use tacbot_agent::keys;
use tacbot_agent::sandbox::SandboxWorld;
use tacbot_agent::{Candidate, MemoryConfig, Perception, PerceptionConfig, Team};
use tacbot_bt::{BtNode, NodeResult};
use tacbot_core::{BbKey, Blackboard, BotError, CancelScope, TickContext};

const BOT: u64 = 1;

fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        dt_seconds: 0.1,
        seed: 7,
    }
}

fn arena() -> SandboxWorld {
    let mut world = SandboxWorld::new(5000.0);
    world.spawn_pawn(BOT, Team(0), Vec3::ZERO);
    world
}

fn perception() -> Perception {
    Perception::new(PerceptionConfig::default(), MemoryConfig::default())
}

fn visible(bb: &Blackboard) -> (Vec<u64>, Vec<u64>, Vec<u64>) {
    let ids = |key: BbKey<Vec<Candidate<u64>>>| -> Vec<u64> {
        bb.get(key)
            .map(|list| list.iter().map(|c| c.actor).collect())
            .unwrap_or_default()
    };
    (
        ids(keys::visible_enemies::<u64>()),
        ids(keys::visible_teammates::<u64>()),
        ids(keys::visible_items::<u64>()),
    )
}

#[test]
fn empty_arena_fails_and_writes_empty_lists() {
    let mut world = arena();
    let mut bb = Blackboard::new();
    let mut node = perception();

    let result = node.evaluate(&ctx(0), BOT, &mut world, &mut bb, &CancelScope::root());
    assert_eq!(result, Ok(NodeResult::Failure));
    assert_eq!(visible(&bb), (vec![], vec![], vec![]));
    assert!(bb
        .get(keys::target_memory::<u64>())
        .is_some_and(|m| m.is_empty()));
}

#[test]
fn classifies_enemies_teammates_and_items() {
    let mut world = arena();
    world.spawn_pawn(2, Team(1), Vec3::new(500.0, 0.0, 0.0));
    world.spawn_pawn(3, Team(0), Vec3::new(0.0, 400.0, 0.0));
    world.spawn_item(4, Vec3::new(-300.0, 0.0, 0.0));
    let mut bb = Blackboard::new();
    let mut node = perception();

    let result = node.evaluate(&ctx(0), BOT, &mut world, &mut bb, &CancelScope::root());
    assert_eq!(result, Ok(NodeResult::Success));
    assert_eq!(visible(&bb), (vec![2], vec![3], vec![4]));

    let memory = bb.get(keys::target_memory::<u64>()).expect("memory");
    assert_eq!(memory.len(), 1, "only enemies are remembered");
    assert_eq!(memory.age_of(2), Some(0.0));
    assert_eq!(
        memory.get(2).map(|e| e.last_position),
        Some(Vec3::new(500.0, 0.0, 0.0))
    );
}

#[test]
fn ignores_dead_and_out_of_range_actors() {
    let mut world = arena();
    world.spawn_pawn(2, Team(1), Vec3::new(2000.0, 0.0, 0.0));
    world.spawn_pawn(3, Team(1), Vec3::new(300.0, 0.0, 0.0));
    world.kill(3);
    let mut bb = Blackboard::new();
    let mut node = perception();

    let result = node.evaluate(&ctx(0), BOT, &mut world, &mut bb, &CancelScope::root());
    assert_eq!(result, Ok(NodeResult::Failure));
    assert!(visible(&bb).0.is_empty());
}

#[test]
fn occluded_enemy_ages_and_is_pruned_after_threshold() {
    let mut world = arena();
    world.spawn_pawn(2, Team(1), Vec3::new(600.0, 0.0, 0.0));
    let mut bb = Blackboard::new();
    let mut node = perception();
    let scope = CancelScope::root();

    assert_eq!(
        node.evaluate(&ctx(0), BOT, &mut world, &mut bb, &scope),
        Ok(NodeResult::Success)
    );

    world.add_wall(Vec3::new(280.0, -200.0, 0.0), Vec3::new(320.0, 200.0, 0.0), 400.0);
    let mut pruned_at = None;
    for tick in 1..80 {
        assert_eq!(
            node.evaluate(&ctx(tick), BOT, &mut world, &mut bb, &scope),
            Ok(NodeResult::Failure)
        );
        let memory = bb.get(keys::target_memory::<u64>()).expect("memory");
        assert!(memory.iter().all(|(_, e)| e.age_seconds <= 5.0));
        if pruned_at.is_none() && !memory.contains(2) {
            pruned_at = Some(tick);
        }
    }
    // 0.1s per pass: the entry is gone on the first pass that pushes it past 5s.
    assert!(matches!(pruned_at, Some(50..=52)), "pruned at {pruned_at:?}");
}

#[test]
fn trace_striking_the_candidate_counts_as_visible() {
    let mut world = arena();
    // Enemy standing right behind another enemy: the nearer one is seen, the farther is hidden.
    world.spawn_pawn(2, Team(1), Vec3::new(400.0, 0.0, 0.0));
    world.spawn_pawn(3, Team(1), Vec3::new(800.0, 0.0, 0.0));
    let mut bb = Blackboard::new();
    let mut node = perception();

    node.evaluate(&ctx(0), BOT, &mut world, &mut bb, &CancelScope::root())
        .expect("perception");
    assert_eq!(visible(&bb).0, vec![2]);
}

#[test]
fn missing_self_is_a_fault() {
    let mut world = SandboxWorld::new(1000.0);
    let mut bb = Blackboard::new();
    let mut node = perception();

    let result = node.evaluate(&ctx(0), BOT, &mut world, &mut bb, &CancelScope::root());
    assert_eq!(result, Err(BotError::MissingActor(BOT)));
}
