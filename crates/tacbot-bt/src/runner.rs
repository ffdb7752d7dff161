use tacbot_core::{Blackboard, CancelScope, Result, TickContext, WorldMut};

use crate::bt::{BtNode, NodeResult};

/// Owns a tree root together with the root cancellation scope.
///
/// The root is reset whenever it settles (or fails with an error), so the next `tick` starts a
/// fresh pass. `cancel` cancels the root scope and drains the tree; `restart` arms a new scope.
pub struct TreeRunner<W>
where
    W: WorldMut + 'static,
{
    root: Box<dyn BtNode<W>>,
    scope: CancelScope,
    last: Option<NodeResult>,
}

impl<W> TreeRunner<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: Box<dyn BtNode<W>>) -> Self {
        Self {
            root,
            scope: CancelScope::root(),
            last: None,
        }
    }

    pub fn root_name(&self) -> &str {
        self.root.name()
    }

    pub fn last_result(&self) -> Option<NodeResult> {
        self.last
    }

    pub fn scope(&self) -> &CancelScope {
        &self.scope
    }

    pub fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<NodeResult> {
        let result = self
            .root
            .evaluate(ctx, agent, world, blackboard, &self.scope);
        match &result {
            Ok(status) if status.is_settled() => self.root.reset(),
            Ok(_) => {}
            Err(_) => self.root.reset(),
        }
        self.last = result.as_ref().ok().copied();
        result
    }

    pub fn cancel(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        self.scope.cancel();
        let drained = self.root.on_cancel(ctx, agent, world, blackboard);
        self.root.reset();
        self.last = None;
        drained
    }

    pub fn restart(&mut self) {
        self.scope = CancelScope::root();
        self.root.reset();
        self.last = None;
    }
}
