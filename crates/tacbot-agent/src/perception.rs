use glam::Vec3;
use tacbot_bt::{BtNode, NodeResult};
use tacbot_core::{AgentId, Blackboard, BotError, CancelScope, Result, TickContext};

use crate::config::{MemoryConfig, PerceptionConfig};
use crate::keys;
use crate::memory::TargetMemory;
use crate::world::{ActorKind, BotWorld, Team};

/// One actor the bot can see this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<A> {
    pub actor: A,
    pub position: Vec3,
    pub team: Team,
    pub alive: bool,
    pub kind: ActorKind,
}

/// Scans for live actors in range and line of sight, classifies them and refreshes target memory.
///
/// `Failure` when nothing at all is visible. The three `visible_*` lists are rewritten every pass,
/// so a stale list never outlives the tick it was computed on.
#[derive(Debug, Clone)]
pub struct Perception {
    config: PerceptionConfig,
    prune_after_seconds: f32,
}

impl Perception {
    pub fn new(config: PerceptionConfig, memory: MemoryConfig) -> Self {
        Self {
            config,
            prune_after_seconds: memory.prune_after_seconds,
        }
    }

    pub fn range(&self) -> f32 {
        self.config.range
    }
}

impl<W: BotWorld> BtNode<W> for Perception {
    fn name(&self) -> &str {
        "Perception"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        let me = world
            .actor(agent)
            .ok_or(BotError::MissingActor(agent.stable_id()))?;

        let mut enemies = Vec::new();
        let mut teammates = Vec::new();
        let mut items = Vec::new();

        for other in world.actors_within(me.position, self.config.range) {
            if other == agent {
                continue;
            }
            let Some(snapshot) = world.actor(other) else {
                continue;
            };
            if !snapshot.alive {
                continue;
            }
            let hit = world.trace_line(me.eye_position, snapshot.eye_position, agent);
            if !hit.reaches(other) {
                continue;
            }

            let candidate = Candidate {
                actor: other,
                position: snapshot.position,
                team: snapshot.team,
                alive: snapshot.alive,
                kind: snapshot.kind,
            };
            match snapshot.kind {
                ActorKind::Item => items.push(candidate),
                ActorKind::Pawn if snapshot.team == me.team => teammates.push(candidate),
                ActorKind::Pawn => enemies.push(candidate),
            }
        }

        let prune_after = self.prune_after_seconds;
        let memory =
            blackboard.get_or_insert_with(keys::target_memory::<W::Actor>(), || {
                TargetMemory::new(prune_after)
            });
        memory.age_all(ctx.dt_seconds);
        for enemy in &enemies {
            memory.refresh(enemy.actor, enemy.position);
        }
        let forgotten = memory.prune();
        for actor in forgotten {
            tracing::trace!(
                agent = agent.stable_id(),
                target = actor.stable_id(),
                "forgot enemy"
            );
        }

        let seen_anything = !(enemies.is_empty() && teammates.is_empty() && items.is_empty());
        blackboard.set(keys::visible_enemies::<W::Actor>(), enemies);
        blackboard.set(keys::visible_teammates::<W::Actor>(), teammates);
        blackboard.set(keys::visible_items::<W::Actor>(), items);

        Ok(if seen_anything {
            NodeResult::Success
        } else {
            NodeResult::Failure
        })
    }

    fn reset(&mut self) {}
}
