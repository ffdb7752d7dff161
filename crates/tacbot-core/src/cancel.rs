//! Hierarchical, tick-aware cancellation scopes.
//!
//! A scope is cancelled when it was cancelled explicitly, when its deadline tick has been reached,
//! or when any ancestor is cancelled. Scopes are cheap `Rc` handles and intentionally `!Send`:
//! a bot's behavior tree is evaluated on a single thread, one tick at a time.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called on this scope or an ancestor.
    Cancelled,
    /// The deadline of this scope or an ancestor was reached.
    DeadlineReached,
}

#[derive(Debug)]
struct ScopeInner {
    cancelled: Cell<bool>,
    deadline_tick: Option<u64>,
    parent: Option<CancelScope>,
}

#[derive(Debug, Clone)]
pub struct CancelScope {
    inner: Rc<ScopeInner>,
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::root()
    }
}

impl CancelScope {
    pub fn root() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                cancelled: Cell::new(false),
                deadline_tick: None,
                parent: None,
            }),
        }
    }

    /// A scope that is cancelled together with `self`, but can also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                cancelled: Cell::new(false),
                deadline_tick: None,
                parent: Some(self.clone()),
            }),
        }
    }

    /// A child scope that additionally expires once `tick >= deadline_tick`.
    pub fn child_with_deadline(&self, deadline_tick: u64) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                cancelled: Cell::new(false),
                deadline_tick: Some(deadline_tick),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
    }

    pub fn deadline_tick(&self) -> Option<u64> {
        self.inner.deadline_tick
    }

    pub fn is_cancelled(&self, tick: u64) -> bool {
        self.reason(tick).is_some()
    }

    /// Why the scope is cancelled at `tick`, nearest cause first.
    pub fn reason(&self, tick: u64) -> Option<CancelReason> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if current.inner.cancelled.get() {
                return Some(CancelReason::Cancelled);
            }
            if current.inner.deadline_tick.is_some_and(|deadline| tick >= deadline) {
                return Some(CancelReason::DeadlineReached);
            }
            scope = current.inner.parent.as_ref();
        }
        None
    }
}
