//! Umbrella crate that re-exports the `tacbot-*` building blocks.
//!
//! Most hosts only need [`prelude`]: implement [`agent::BotWorld`] for the game world, build one
//! [`agent::BotController`] per bot and call `tick` once per fixed step.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use tacbot_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use tacbot_tools as tools;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use tacbot_bt as bt;

#[cfg(feature = "agent")]
#[cfg_attr(docsrs, doc(cfg(feature = "agent")))]
pub use tacbot_agent as agent;

#[cfg(feature = "agent")]
#[cfg_attr(docsrs, doc(cfg(feature = "agent")))]
pub mod prelude {
    pub use tacbot_agent::{
        ActorKind, ActorSnapshot, ActorWorld, BotConfig, BotController, BotWorld, Hitbox,
        NavAgent, Team, TraceHit, TraceWorld, WeaponWorld,
    };
    pub use tacbot_bt::NodeResult;
    pub use tacbot_core::{AgentId, BotError, TickContext, WorldMut, WorldView};
    pub use tacbot_tools::{TraceEvent, TraceLog, TRACE_LOG};
}
