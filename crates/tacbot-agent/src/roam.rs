use tacbot_bt::{BtNode, NodeResult, Parallel};
use tacbot_core::{AgentId, Blackboard, CancelScope, Result, TickContext};
use tacbot_tools::{emit, TraceEvent};

use crate::config::BotConfig;
use crate::keys;
use crate::movement::{LookAlongHeading, Wander};
use crate::world::BotWorld;

/// Roam branch that fails the moment a target is selected.
#[derive(Debug, Default)]
pub struct WatchForTarget {
    started: bool,
}

impl WatchForTarget {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.started = false;
    }
}

impl<W: BotWorld> BtNode<W> for WatchForTarget {
    fn name(&self) -> &str {
        "WatchForTarget"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        _world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        if let Some(target) = blackboard.get(keys::current_target::<W::Actor>()).copied() {
            if self.started {
                tracing::debug!(
                    agent = agent.stable_id(),
                    target = target.stable_id(),
                    "target spotted, leaving roam"
                );
                emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "roam.end").with_subject(target.stable_id()),
                );
            }
            self.clear();
            return Ok(NodeResult::Failure);
        }

        if !self.started {
            self.started = true;
            tracing::debug!(agent = agent.stable_id(), "roaming");
            emit(blackboard, TraceEvent::new(ctx.tick, "roam.start"));
        }
        Ok(NodeResult::Running)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// `Parallel[watch for target, look along heading, wander]`.
pub fn build_roam<W: BotWorld>(config: &BotConfig) -> Parallel<W> {
    Parallel::new(vec![
        Box::new(WatchForTarget::new()) as Box<dyn BtNode<W>>,
        Box::new(LookAlongHeading::new(&config.aim)),
        Box::new(Wander::new(config.movement)),
    ])
    .named("roam")
}
