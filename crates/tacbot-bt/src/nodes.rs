use std::borrow::Cow;

use tacbot_core::{AgentId, Blackboard, BotError, CancelReason, CancelScope, Result, TickContext, WorldMut};
use tacbot_tools::{emit as trace_emit, TraceEvent};

use crate::bt::{BtNode, NodeResult};

/// Runs children in order, resuming a `Running` child on the next tick.
///
/// The first child that does not succeed decides the result; later children are not evaluated.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    children: Vec<Box<dyn BtNode<W>>>,
    index: usize,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            name: Cow::Borrowed("Sequence"),
            children,
            index: 0,
        }
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<W> BtNode<W> for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        scope: &CancelScope,
    ) -> Result<NodeResult> {
        while self.index < self.children.len() {
            let result =
                self.children[self.index].evaluate(ctx, agent, world, blackboard, scope);
            match result {
                Ok(NodeResult::Success) => self.index += 1,
                Ok(NodeResult::Running) => return Ok(NodeResult::Running),
                Ok(NodeResult::Failure) => {
                    self.reset();
                    return Ok(NodeResult::Failure);
                }
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            }
        }

        self.reset();
        Ok(NodeResult::Success)
    }

    fn on_cancel(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        let drained = match self.children.get_mut(self.index) {
            Some(child) => child.on_cancel(ctx, agent, world, blackboard),
            None => Ok(()),
        };
        self.reset();
        drained
    }

    fn reset(&mut self) {
        self.index = 0;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Tries children in order until one succeeds or is still running.
///
/// A failing child falls through to the next one within the same tick; a `Running` child is
/// resumed on the next tick without re-checking earlier children.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    children: Vec<Box<dyn BtNode<W>>>,
    index: usize,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            name: Cow::Borrowed("Selector"),
            children,
            index: 0,
        }
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Index of the child currently being evaluated or resumed.
    pub fn active_child(&self) -> Option<usize> {
        (self.index < self.children.len()).then_some(self.index)
    }
}

impl<W> BtNode<W> for Selector<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        scope: &CancelScope,
    ) -> Result<NodeResult> {
        while self.index < self.children.len() {
            let result =
                self.children[self.index].evaluate(ctx, agent, world, blackboard, scope);
            match result {
                Ok(NodeResult::Failure) => {
                    tracing::trace!(
                        agent = agent.stable_id(),
                        node = self.children[self.index].name(),
                        "selector branch failed, falling back"
                    );
                    self.index += 1;
                }
                Ok(NodeResult::Running) => return Ok(NodeResult::Running),
                Ok(NodeResult::Success) => {
                    self.reset();
                    return Ok(NodeResult::Success);
                }
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            }
        }

        self.reset();
        Ok(NodeResult::Failure)
    }

    fn on_cancel(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        let drained = match self.children.get_mut(self.index) {
            Some(child) => child.on_cancel(ctx, agent, world, blackboard),
            None => Ok(()),
        };
        self.reset();
        drained
    }

    fn reset(&mut self) {
        self.index = 0;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Runs all children concurrently under a shared child scope.
///
/// Fail-fast (the default): the first child failure settles the node to `Failure` in the same
/// tick; the child scope is cancelled and every sibling still running is drained before
/// returning. Otherwise the node waits for every child and succeeds only if all of them did.
/// A child error always cancels and drains the siblings, then propagates.
pub struct Parallel<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    children: Vec<Box<dyn BtNode<W>>>,
    fail_fast: bool,
    results: Vec<Option<NodeResult>>,
    scope: Option<CancelScope>,
}

impl<W> Parallel<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            name: Cow::Borrowed("Parallel"),
            children,
            fail_fast: true,
            results: Vec::new(),
            scope: None,
        }
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn is_running(&self) -> bool {
        self.scope.is_some()
    }

    /// Drain every child that has not settled yet, reporting the first error.
    fn drain(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        let mut first_error: Option<BotError> = None;
        for (child, result) in self.children.iter_mut().zip(self.results.iter_mut()) {
            if result.is_some() {
                continue;
            }
            if let Err(err) = child.on_cancel(ctx, agent, world, blackboard) {
                first_error.get_or_insert(err);
            }
            *result = Some(NodeResult::Failure);
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<W> BtNode<W> for Parallel<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        scope: &CancelScope,
    ) -> Result<NodeResult> {
        let run_scope = self.scope.get_or_insert_with(|| scope.child()).clone();
        if self.results.len() != self.children.len() {
            self.results = vec![None; self.children.len()];
        }

        let mut failed_child: Option<usize> = None;
        let mut error: Option<BotError> = None;
        for i in 0..self.children.len() {
            if self.results[i].is_some() {
                continue;
            }
            match self.children[i].evaluate(ctx, agent, world, blackboard, &run_scope) {
                Ok(NodeResult::Running) => {}
                Ok(result) => {
                    self.results[i] = Some(result);
                    if result == NodeResult::Failure && self.fail_fast {
                        failed_child = Some(i);
                        break;
                    }
                }
                Err(err) => {
                    self.results[i] = Some(NodeResult::Failure);
                    error = Some(err);
                    break;
                }
            }
        }

        if failed_child.is_some() || error.is_some() {
            if let Some(i) = failed_child {
                tracing::debug!(
                    agent = agent.stable_id(),
                    node = %self.name,
                    child = self.children[i].name(),
                    "parallel branch failed, cancelling siblings"
                );
                trace_emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "bt.parallel.fail_fast").with_detail(i as u64),
                );
            }
            run_scope.cancel();
            let drained = self.drain(ctx, agent, world, blackboard);
            self.reset();
            if let Some(err) = error {
                return Err(err);
            }
            drained?;
            return Ok(NodeResult::Failure);
        }

        if self.results.iter().all(Option::is_some) {
            let all_succeeded = self
                .results
                .iter()
                .all(|r| *r == Some(NodeResult::Success));
            self.reset();
            return Ok(if all_succeeded {
                NodeResult::Success
            } else {
                NodeResult::Failure
            });
        }

        Ok(NodeResult::Running)
    }

    fn on_cancel(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        if let Some(scope) = self.scope.as_ref() {
            scope.cancel();
        }
        if self.results.len() != self.children.len() {
            self.results = vec![None; self.children.len()];
        }
        let drained = self.drain(ctx, agent, world, blackboard);
        self.reset();
        drained
    }

    fn reset(&mut self) {
        self.results.clear();
        self.scope = None;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Runs its child under a deadline scope linked to the caller's scope.
///
/// Whichever fires first, the deadline or the caller's cancellation, drains the child; the node
/// then settles to `Failure`.
pub struct Timeout<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    child: Box<dyn BtNode<W>>,
    duration_seconds: f32,
    scope: Option<CancelScope>,
}

impl<W> Timeout<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Box<dyn BtNode<W>>, duration_seconds: f32) -> Self {
        Self {
            name: Cow::Borrowed("Timeout"),
            child,
            duration_seconds,
            scope: None,
        }
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn deadline_tick(&self) -> Option<u64> {
        self.scope.as_ref().and_then(CancelScope::deadline_tick)
    }
}

impl<W> BtNode<W> for Timeout<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        scope: &CancelScope,
    ) -> Result<NodeResult> {
        let duration = self.duration_seconds;
        let run_scope = self
            .scope
            .get_or_insert_with(|| scope.child_with_deadline(ctx.deadline_after(duration)))
            .clone();

        let result = match self.child.evaluate(ctx, agent, world, blackboard, &run_scope) {
            Ok(result) => result,
            Err(err) => {
                self.reset();
                return Err(err);
            }
        };

        if result == NodeResult::Failure
            && run_scope.reason(ctx.tick) == Some(CancelReason::DeadlineReached)
        {
            tracing::debug!(
                agent = agent.stable_id(),
                node = %self.name,
                budget_seconds = duration,
                "time budget exhausted"
            );
            trace_emit(
                blackboard,
                TraceEvent::new(ctx.tick, "bt.timeout").with_subject(agent.stable_id()),
            );
        }

        if result.is_settled() {
            self.reset();
        }
        Ok(result)
    }

    fn on_cancel(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        if let Some(scope) = self.scope.as_ref() {
            scope.cancel();
        }
        let drained = self.child.on_cancel(ctx, agent, world, blackboard);
        self.reset();
        drained
    }

    fn reset(&mut self) {
        self.scope = None;
        self.child.reset();
    }
}

/// Leaf that turns a predicate into `Success` / `Failure`.
pub struct Condition<F> {
    name: Cow<'static, str>,
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, cond: F) -> Self {
        Self {
            name: name.into(),
            cond,
        }
    }
}

impl<F, W> BtNode<W> for Condition<F>
where
    F: FnMut(&TickContext, W::Actor, &W, &Blackboard) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        if (self.cond)(ctx, agent, &*world, &*blackboard) {
            Ok(NodeResult::Success)
        } else {
            Ok(NodeResult::Failure)
        }
    }

    fn reset(&mut self) {}
}
