use tacbot_bt::{BtNode, Condition, NodeResult, Parallel, Sequence};
use tacbot_core::{AgentId, Blackboard, CancelScope, Result, TickContext};
use tacbot_tools::{emit, TraceEvent};

use crate::aim::AimAtTarget;
use crate::config::{BotConfig, TargetingConfig};
use crate::keys;
use crate::movement::EngageMovement;
use crate::shooting::{Reload, ShootTarget};
use crate::world::BotWorld;

/// Combat branch that keeps checking the target is still worth fighting.
///
/// Fails, ending combat, once the current target is gone, dead or no longer remembered. Emits
/// `combat.start` on its first tick and `combat.end` whenever combat stops.
pub struct ValidateTarget {
    interval_seconds: f32,
    next_check_at: Option<f64>,
    started: bool,
}

impl ValidateTarget {
    pub fn new(config: TargetingConfig) -> Self {
        Self {
            interval_seconds: config.validation_interval_seconds,
            next_check_at: None,
            started: false,
        }
    }

    fn end<A: AgentId>(&mut self, ctx: &TickContext, agent: A, blackboard: &mut Blackboard) {
        if !self.started {
            return;
        }
        tracing::debug!(agent = agent.stable_id(), "combat ended");
        emit(blackboard, TraceEvent::new(ctx.tick, "combat.end"));
        self.started = false;
    }

    fn clear(&mut self) {
        self.next_check_at = None;
        self.started = false;
    }
}

fn target_valid<W: BotWorld>(world: &W, blackboard: &Blackboard) -> bool {
    let Some(target) = blackboard.get(keys::current_target::<W::Actor>()).copied() else {
        return false;
    };
    let alive = world.actor(target).is_some_and(|s| s.alive);
    let remembered = blackboard
        .get(keys::target_memory::<W::Actor>())
        .is_some_and(|m| m.contains(target));
    alive && remembered
}

impl<W: BotWorld> BtNode<W> for ValidateTarget {
    fn name(&self) -> &str {
        "ValidateTarget"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        if !self.started {
            self.started = true;
            let target = blackboard
                .get(keys::current_target::<W::Actor>())
                .map_or(0, |t| t.stable_id());
            tracing::debug!(agent = agent.stable_id(), target, "combat started");
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "combat.start").with_subject(target),
            );
        }

        let now = ctx.time_seconds();
        if self.next_check_at.is_some_and(|at| now + 1e-6 < at) {
            return Ok(NodeResult::Running);
        }
        self.next_check_at = Some(now + f64::from(self.interval_seconds));

        if target_valid(&*world, blackboard) {
            Ok(NodeResult::Running)
        } else {
            self.end(ctx, agent, blackboard);
            self.clear();
            Ok(NodeResult::Failure)
        }
    }

    fn on_cancel(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        self.end(ctx, agent, blackboard);
        self.clear();
        Ok(())
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// `Sequence[has target, Parallel[validate, aim, move, shoot, reload]]`.
pub fn build_combat<W: BotWorld>(config: &BotConfig) -> Sequence<W> {
    let has_target = Condition::new(
        "HasTarget",
        |_: &TickContext, _: W::Actor, _: &W, blackboard: &Blackboard| {
            blackboard.contains(keys::current_target::<W::Actor>())
        },
    );

    let engage: Parallel<W> = Parallel::new(vec![
        Box::new(ValidateTarget::new(config.targeting)) as Box<dyn BtNode<W>>,
        Box::new(AimAtTarget::<W::Actor>::new(config.aim.clone())),
        Box::new(EngageMovement::new(config.movement, &config.aim)),
        Box::new(ShootTarget::new(config.shooting)),
        Box::new(Reload::new(config.shooting)),
    ])
    .named("combat.engage");

    Sequence::new(vec![
        Box::new(has_target) as Box<dyn BtNode<W>>,
        Box::new(engage),
    ])
    .named("combat")
}
