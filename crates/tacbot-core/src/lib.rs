//! Deterministic, engine-agnostic kernel primitives for tactical shooter bots.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod cancel;
pub mod error;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::AgentId;
pub use blackboard::{BbKey, Blackboard};
pub use cancel::{CancelReason, CancelScope};
pub use error::{BotError, Result};
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
