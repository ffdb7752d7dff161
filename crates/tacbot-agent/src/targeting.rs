use std::cmp::Ordering;

use tacbot_bt::{BtNode, NodeResult};
use tacbot_core::{AgentId, Blackboard, BotError, CancelScope, Result, TickContext};
use tacbot_tools::{emit, TraceEvent};

use crate::config::{MemoryConfig, TargetingConfig};
use crate::keys;
use crate::memory::TargetMemory;
use crate::world::BotWorld;

/// Which enemy the bot is fighting and for how long it has held it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetingState<A> {
    pub current: Option<A>,
    pub held_seconds: f32,
}

impl<A> Default for TargetingState<A> {
    fn default() -> Self {
        Self {
            current: None,
            held_seconds: 0.0,
        }
    }
}

/// Picks the current target from target memory.
///
/// A target seen this tick is kept until the hysteresis window elapses. Otherwise the freshest
/// remembered enemy wins (then best aim alignment, then lowest id). With nothing to pick the
/// current target is cleared and the node fails in the same tick.
#[derive(Debug, Clone)]
pub struct Targeting {
    config: TargetingConfig,
    prune_after_seconds: f32,
}

struct Scored<A> {
    actor: A,
    age: f32,
    alignment: f32,
}

impl Targeting {
    pub fn new(config: TargetingConfig, memory: MemoryConfig) -> Self {
        Self {
            config,
            prune_after_seconds: memory.prune_after_seconds,
        }
    }
}

fn better<A: Ord>(a: &Scored<A>, b: &Scored<A>) -> Ordering {
    a.age
        .total_cmp(&b.age)
        .then_with(|| b.alignment.total_cmp(&a.alignment))
        .then_with(|| a.actor.cmp(&b.actor))
}

impl<W: BotWorld> BtNode<W> for Targeting {
    fn name(&self) -> &str {
        "Targeting"
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
        let eye = me.eye_position;
        let forward = me.eye_forward();

        let prune_after = self.prune_after_seconds;
        let memory = blackboard.get_or_insert_with(keys::target_memory::<W::Actor>(), || {
            TargetMemory::new(prune_after)
        });
        let dead: Vec<W::Actor> = memory
            .iter()
            .filter(|(actor, _)| !world.actor(*actor).is_some_and(|s| s.alive))
            .map(|(actor, _)| actor)
            .collect();
        for actor in dead {
            memory.forget(actor);
        }
        memory.prune();

        let candidates: Vec<Scored<W::Actor>> = memory
            .iter()
            .map(|(actor, entry)| Scored {
                actor,
                age: entry.age_seconds,
                alignment: (entry.last_position - eye).normalize_or_zero().dot(forward),
            })
            .collect();

        let mut state = blackboard
            .get(keys::targeting_state::<W::Actor>())
            .copied()
            .unwrap_or_default();
        let previous = state.current;
        if previous.is_some() {
            state.held_seconds += ctx.dt_seconds;
        }

        // Only a target in sight this tick is held; an occluded one competes on freshness.
        let current_seen = previous
            .is_some_and(|p| candidates.iter().any(|c| c.actor == p && c.age <= 0.0));
        let next = if current_seen && state.held_seconds < self.config.switch_hysteresis_seconds {
            previous
        } else {
            state.held_seconds = 0.0;
            candidates.iter().min_by(|a, b| better(a, b)).map(|c| c.actor)
        };
        state.current = next;
        if next.is_none() {
            state.held_seconds = 0.0;
        }
        blackboard.set(keys::targeting_state::<W::Actor>(), state);

        if next != previous {
            if let Some(lost) = previous {
                tracing::debug!(
                    agent = agent.stable_id(),
                    target = lost.stable_id(),
                    "target lost"
                );
                emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "target.lost").with_subject(lost.stable_id()),
                );
            }
            if let Some(acquired) = next {
                tracing::debug!(
                    agent = agent.stable_id(),
                    target = acquired.stable_id(),
                    "target acquired"
                );
                emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "target.acquired")
                        .with_subject(acquired.stable_id()),
                );
            }
        }

        match next {
            Some(target) => {
                blackboard.set(keys::current_target::<W::Actor>(), target);
                Ok(NodeResult::Success)
            }
            None => {
                blackboard.remove(keys::current_target::<W::Actor>());
                Ok(NodeResult::Failure)
            }
        }
    }

    fn reset(&mut self) {}
}
