//! Behavior tree runtime built on `tacbot-core`.
//!
//! Nodes are explicit state machines that suspend by returning [`NodeResult::Running`] and are
//! resumed on the next fixed tick. Every evaluation receives a [`tacbot_core::CancelScope`];
//! composites derive child scopes from it so that cancelling a parent reaches every descendant,
//! and every started child is drained before a composite settles.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod nodes;
pub mod runner;

pub use bt::{BtNode, NodeResult};
pub use nodes::{Condition, Parallel, Selector, Sequence, Timeout};
pub use runner::TreeRunner;
