use tacbot_bt::{BtNode, Condition, NodeResult, Parallel, Selector, Sequence, Timeout};
use tacbot_core::{
    Blackboard, BotError, CancelScope, Result, TickContext, WorldMut, WorldView,
};
use tacbot_tools::{TraceLog, TRACE_LOG};

#[derive(Debug, Default)]
struct RecordingWorld {
    ticked: Vec<&'static str>,
    cancelled: Vec<&'static str>,
}

impl WorldView for RecordingWorld {
    type Actor = u64;
}

impl WorldMut for RecordingWorld {}

/// Leaf that replays a fixed list of results, repeating the last one.
struct Scripted {
    name: &'static str,
    script: Vec<Result<NodeResult>>,
    step: usize,
}

impl Scripted {
    fn new(name: &'static str, script: Vec<NodeResult>) -> Self {
        Self {
            name,
            script: script.into_iter().map(Ok).collect(),
            step: 0,
        }
    }

    fn erroring(name: &'static str) -> Self {
        Self {
            name,
            script: vec![Err(BotError::MissingActor(99))],
            step: 0,
        }
    }

    fn boxed(self) -> Box<dyn BtNode<RecordingWorld>> {
        Box::new(self)
    }
}

impl BtNode<RecordingWorld> for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut RecordingWorld,
        _blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        world.ticked.push(self.name);
        let idx = self.step.min(self.script.len() - 1);
        self.step += 1;
        self.script[idx].clone()
    }

    fn on_cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut RecordingWorld,
        _blackboard: &mut Blackboard,
    ) -> Result<()> {
        world.cancelled.push(self.name);
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.step = 0;
    }
}

fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        dt_seconds: 0.1,
        seed: 7,
    }
}

fn run(
    node: &mut dyn BtNode<RecordingWorld>,
    world: &mut RecordingWorld,
    bb: &mut Blackboard,
    scope: &CancelScope,
    tick: u64,
) -> NodeResult {
    node.evaluate(&ctx(tick), 1, world, bb, scope)
        .expect("no fault expected")
}

#[test]
fn sequence_stops_at_first_non_success() {
    use NodeResult::*;

    for stop in [Failure, Running] {
        let mut seq = Sequence::new(vec![
            Scripted::new("a", vec![Success]).boxed(),
            Scripted::new("b", vec![stop]).boxed(),
            Scripted::new("c", vec![Success]).boxed(),
        ]);
        let mut world = RecordingWorld::default();
        let mut bb = Blackboard::new();

        let result = run(&mut seq, &mut world, &mut bb, &CancelScope::root(), 0);

        assert_eq!(result, stop);
        assert_eq!(world.ticked, vec!["a", "b"]);
    }
}

#[test]
fn sequence_resumes_running_child_without_replaying_earlier_ones() {
    use NodeResult::*;

    let mut seq = Sequence::new(vec![
        Scripted::new("a", vec![Success]).boxed(),
        Scripted::new("b", vec![Running, Success]).boxed(),
        Scripted::new("c", vec![Success]).boxed(),
    ]);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    let scope = CancelScope::root();

    assert_eq!(run(&mut seq, &mut world, &mut bb, &scope, 0), Running);
    assert_eq!(run(&mut seq, &mut world, &mut bb, &scope, 1), Success);
    assert_eq!(world.ticked, vec!["a", "b", "b", "c"]);
}

#[test]
fn empty_sequence_succeeds_and_empty_selector_fails() {
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    let scope = CancelScope::root();

    let mut seq = Sequence::<RecordingWorld>::new(vec![]);
    let mut sel = Selector::<RecordingWorld>::new(vec![]);

    assert_eq!(run(&mut seq, &mut world, &mut bb, &scope, 0), NodeResult::Success);
    assert_eq!(run(&mut sel, &mut world, &mut bb, &scope, 0), NodeResult::Failure);
}

#[test]
fn selector_falls_back_within_the_same_tick() {
    use NodeResult::*;

    let mut sel = Selector::new(vec![
        Scripted::new("combat", vec![Failure]).boxed(),
        Scripted::new("roam", vec![Running]).boxed(),
        Scripted::new("idle", vec![Success]).boxed(),
    ]);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    let scope = CancelScope::root();

    assert_eq!(run(&mut sel, &mut world, &mut bb, &scope, 0), Running);
    assert_eq!(sel.active_child(), Some(1));
    assert_eq!(run(&mut sel, &mut world, &mut bb, &scope, 1), Running);
    assert_eq!(world.ticked, vec!["combat", "roam", "roam"]);
}

#[test]
fn fail_fast_parallel_fails_on_the_tick_the_child_fails_and_drains_siblings() {
    use NodeResult::*;

    let mut par = Parallel::new(vec![
        Scripted::new("aim", vec![Running]).boxed(),
        Scripted::new("validate", vec![Running, Running, Failure]).boxed(),
        Scripted::new("shoot", vec![Running]).boxed(),
    ]);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());
    let scope = CancelScope::root();

    assert_eq!(run(&mut par, &mut world, &mut bb, &scope, 0), Running);
    assert_eq!(run(&mut par, &mut world, &mut bb, &scope, 1), Running);
    assert!(world.cancelled.is_empty());

    assert_eq!(run(&mut par, &mut world, &mut bb, &scope, 2), Failure);
    assert_eq!(world.cancelled, vec!["aim", "shoot"]);
    assert!(!par.is_running());

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.first_tick("bt.parallel.fail_fast"), Some(2));
}

#[test]
fn fail_fast_parallel_does_not_wait_for_long_running_children() {
    use NodeResult::*;

    let mut par = Parallel::new(vec![
        Scripted::new("forever", vec![Running]).boxed(),
        Scripted::new("quick", vec![Failure]).boxed(),
    ]);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();

    assert_eq!(
        run(&mut par, &mut world, &mut bb, &CancelScope::root(), 0),
        Failure
    );
    assert_eq!(world.cancelled, vec!["forever"]);
}

#[test]
fn waiting_parallel_requires_every_child_to_succeed() {
    use NodeResult::*;

    let mut par = Parallel::new(vec![
        Scripted::new("a", vec![Running, Success]).boxed(),
        Scripted::new("b", vec![Failure]).boxed(),
    ])
    .with_fail_fast(false);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    let scope = CancelScope::root();

    assert_eq!(run(&mut par, &mut world, &mut bb, &scope, 0), Running);
    assert_eq!(run(&mut par, &mut world, &mut bb, &scope, 1), Failure);
    // "b" settled on tick 0 and is not re-evaluated.
    assert_eq!(world.ticked, vec!["a", "b", "a"]);

    let mut ok = Parallel::new(vec![
        Scripted::new("a", vec![Success]).boxed(),
        Scripted::new("b", vec![Running, Success]).boxed(),
    ])
    .with_fail_fast(false);
    assert_eq!(run(&mut ok, &mut world, &mut bb, &scope, 0), Running);
    assert_eq!(run(&mut ok, &mut world, &mut bb, &scope, 1), Success);
}

#[test]
fn parallel_error_drains_siblings_then_propagates() {
    let mut par = Parallel::new(vec![
        Scripted::new("aim", vec![NodeResult::Running]).boxed(),
        Scripted::erroring("broken").boxed(),
        Scripted::new("shoot", vec![NodeResult::Running]).boxed(),
    ]);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();

    let result = par.evaluate(&ctx(0), 1, &mut world, &mut bb, &CancelScope::root());

    assert_eq!(result, Err(BotError::MissingActor(99)));
    assert_eq!(world.cancelled, vec!["aim", "shoot"]);
}

#[test]
fn cancelled_scope_drains_without_ticking() {
    let mut seq = Sequence::new(vec![
        Scripted::new("a", vec![NodeResult::Running]).boxed(),
    ]);
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    let scope = CancelScope::root();

    assert_eq!(run(&mut seq, &mut world, &mut bb, &scope, 0), NodeResult::Running);
    scope.cancel();
    assert_eq!(run(&mut seq, &mut world, &mut bb, &scope, 1), NodeResult::Failure);

    assert_eq!(world.ticked, vec!["a"]);
    assert_eq!(world.cancelled, vec!["a"]);
}

#[test]
fn timeout_cancels_child_when_budget_runs_out() {
    let mut timeout = Timeout::new(
        Scripted::new("roam", vec![NodeResult::Running]).boxed(),
        0.3,
    );
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());
    let scope = CancelScope::root();

    for tick in 0..3 {
        assert_eq!(
            run(&mut timeout, &mut world, &mut bb, &scope, tick),
            NodeResult::Running
        );
    }
    assert_eq!(timeout.deadline_tick(), Some(3));

    assert_eq!(run(&mut timeout, &mut world, &mut bb, &scope, 3), NodeResult::Failure);
    assert_eq!(world.ticked.len(), 3);
    assert_eq!(world.cancelled, vec!["roam"]);
    assert_eq!(bb.get(TRACE_LOG).unwrap().first_tick("bt.timeout"), Some(3));

    // A fresh run gets a fresh deadline.
    assert_eq!(run(&mut timeout, &mut world, &mut bb, &scope, 4), NodeResult::Running);
    assert_eq!(timeout.deadline_tick(), Some(7));
}

#[test]
fn timeout_yields_to_caller_cancellation_first() {
    let mut timeout = Timeout::new(
        Scripted::new("combat", vec![NodeResult::Running]).boxed(),
        30.0,
    );
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());
    let scope = CancelScope::root();

    assert_eq!(run(&mut timeout, &mut world, &mut bb, &scope, 0), NodeResult::Running);
    scope.cancel();
    assert_eq!(run(&mut timeout, &mut world, &mut bb, &scope, 1), NodeResult::Failure);

    assert_eq!(world.cancelled, vec!["combat"]);
    assert_eq!(bb.get(TRACE_LOG).unwrap().count("bt.timeout"), 0);
}

#[test]
fn condition_reads_blackboard() {
    const ALERT: tacbot_core::BbKey<bool> = tacbot_core::BbKey::new("alert");

    let mut cond = Condition::new(
        "alert",
        |_: &TickContext, _: u64, _: &RecordingWorld, bb: &Blackboard| {
            bb.get(ALERT).copied().unwrap_or(false)
        },
    );
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    let scope = CancelScope::root();

    assert_eq!(run(&mut cond, &mut world, &mut bb, &scope, 0), NodeResult::Failure);
    bb.set(ALERT, true);
    assert_eq!(run(&mut cond, &mut world, &mut bb, &scope, 1), NodeResult::Success);
}
