use tacbot_bt::{BtNode, NodeResult, Selector, Timeout, TreeRunner};
use tacbot_core::{AgentId, Blackboard, BotError, CancelScope, Result, TickContext};
use tacbot_tools::{emit, TraceEvent};

use crate::combat::build_combat;
use crate::config::BotConfig;
use crate::keys;
use crate::perception::Perception;
use crate::roam::build_roam;
use crate::targeting::Targeting;
use crate::world::BotWorld;

/// Per-bot driver: senses, selects a target and advances the behavior tree once per fixed tick.
///
/// The tree is `Timeout(Selector[combat, roam], iteration_budget)`, wired once at construction. A
/// controller starts disabled; nothing runs until [`BotController::enable`].
pub struct BotController<W>
where
    W: BotWorld,
{
    agent: W::Actor,
    config: BotConfig,
    blackboard: Blackboard,
    perception: Perception,
    targeting: Targeting,
    runner: TreeRunner<W>,
    sense_scope: CancelScope,
    enabled: bool,
    backoff_until: Option<u64>,
}

impl<W> BotController<W>
where
    W: BotWorld,
{
    pub fn new(agent: W::Actor, config: BotConfig) -> Result<Self> {
        config.validate()?;

        let behavior: Selector<W> = Selector::new(vec![
            Box::new(build_combat::<W>(&config)) as Box<dyn BtNode<W>>,
            Box::new(build_roam::<W>(&config)),
        ])
        .named("behavior");
        let root = Timeout::new(Box::new(behavior), config.controller.iteration_budget_seconds)
            .named("iteration");

        Ok(Self {
            agent,
            perception: Perception::new(config.perception, config.memory),
            targeting: Targeting::new(config.targeting, config.memory),
            runner: TreeRunner::new(Box::new(root)),
            config,
            blackboard: Blackboard::new(),
            sense_scope: CancelScope::root(),
            enabled: false,
            backoff_until: None,
        })
    }

    pub fn agent(&self) -> W::Actor {
        self.agent
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while the controller is pausing after a fault.
    pub fn is_backing_off(&self) -> bool {
        self.backoff_until.is_some()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    /// Mutable access, e.g. to install a `TraceLog` before enabling.
    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn current_target(&self) -> Option<W::Actor> {
        self.blackboard
            .get(keys::current_target::<W::Actor>())
            .copied()
    }

    pub fn last_result(&self) -> Option<NodeResult> {
        self.runner.last_result()
    }

    pub fn enable(&mut self, ctx: &TickContext) {
        if self.enabled {
            return;
        }
        self.runner.restart();
        self.enabled = true;
        self.backoff_until = None;
        tracing::info!(agent = self.agent.stable_id(), tick = ctx.tick, "bot enabled");
    }

    /// Cancel the behavior tree and drain every running branch before returning.
    pub fn disable(&mut self, ctx: &TickContext, world: &mut W) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.backoff_until = None;
        if let Err(err) = self
            .runner
            .cancel(ctx, self.agent, world, &mut self.blackboard)
        {
            tracing::error!(
                agent = self.agent.stable_id(),
                error = %err,
                "fault while draining behavior tree"
            );
        }
        tracing::info!(agent = self.agent.stable_id(), tick = ctx.tick, "bot disabled");
    }

    /// Advance one fixed step.
    ///
    /// Returns the tree's result this tick, or `None` when disabled, backing off, or after a fault.
    /// Faults never escape: they are logged, the tree is drained and the controller backs off.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Option<NodeResult> {
        if !self.enabled {
            return None;
        }
        match self.step(ctx, world) {
            Ok(result) => result,
            Err(err) => {
                self.fault(ctx, world, err);
                None
            }
        }
    }

    fn step(&mut self, ctx: &TickContext, world: &mut W) -> Result<Option<NodeResult>> {
        let agent = self.agent;
        let me = world
            .actor(agent)
            .ok_or(BotError::MissingActor(agent.stable_id()))?;
        world.sync_agent(agent, me.position, me.velocity);

        let bb = &mut self.blackboard;
        self.perception
            .evaluate(ctx, agent, world, bb, &self.sense_scope)?;
        self.targeting
            .evaluate(ctx, agent, world, bb, &self.sense_scope)?;

        if let Some(until) = self.backoff_until {
            if ctx.tick < until {
                return Ok(None);
            }
            self.backoff_until = None;
            self.runner.restart();
            tracing::debug!(agent = agent.stable_id(), "resuming after fault");
        }

        let mut result = self.runner.tick(ctx, agent, world, bb)?;
        if result.is_settled() {
            tracing::debug!(
                agent = agent.stable_id(),
                node = self.runner.root_name(),
                ?result,
                "behavior pass settled, restarting"
            );
            result = self.runner.tick(ctx, agent, world, bb)?;
        }
        Ok(Some(result))
    }

    fn fault(&mut self, ctx: &TickContext, world: &mut W, err: BotError) {
        let agent = self.agent;
        if self.backoff_until.is_some_and(|until| ctx.tick < until) {
            tracing::debug!(agent = agent.stable_id(), error = %err, "fault while backing off");
            return;
        }
        tracing::error!(
            agent = agent.stable_id(),
            error = %err,
            backoff_seconds = self.config.controller.fault_backoff_seconds,
            "bot fault, draining behavior tree"
        );
        if let Err(drain) = self.runner.cancel(ctx, agent, world, &mut self.blackboard) {
            tracing::error!(agent = agent.stable_id(), error = %drain, "fault while draining behavior tree");
        }
        emit(
            &mut self.blackboard,
            TraceEvent::new(ctx.tick, "controller.fault").with_subject(agent.stable_id()),
        );
        self.backoff_until = Some(ctx.deadline_after(self.config.controller.fault_backoff_seconds));
    }
}
