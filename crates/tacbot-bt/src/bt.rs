use tacbot_core::{Blackboard, CancelScope, Result, TickContext, WorldMut};

/// Outcome of one evaluation of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeResult {
    Failure,
    Success,
    /// Still in progress; evaluate again next tick. Never a final answer.
    Running,
}

impl NodeResult {
    pub fn is_settled(self) -> bool {
        !matches!(self, NodeResult::Running)
    }
}

pub trait BtNode<W>: 'static
where
    W: WorldMut + 'static,
{
    /// Display name for diagnostics.
    fn name(&self) -> &str;

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        scope: &CancelScope,
    ) -> Result<NodeResult>;

    /// Stop in-flight work after the node lost a race or its scope was cancelled.
    ///
    /// Composites drain their running children here. Errors are reported, not swallowed.
    fn on_cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Actor,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn reset(&mut self);

    /// Entry point used by parents: a cancelled scope drains the node and settles to `Failure`
    /// without ticking it.
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        scope: &CancelScope,
    ) -> Result<NodeResult> {
        if scope.is_cancelled(ctx.tick) {
            self.on_cancel(ctx, agent, world, blackboard)?;
            return Ok(NodeResult::Failure);
        }
        self.tick(ctx, agent, world, blackboard, scope)
    }
}
