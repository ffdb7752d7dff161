//! Blackboard keys shared by the agent's nodes.
//!
//! Keys are generic over the actor id type, so they are built by `const fn` rather than stored in
//! constants. A missing entry means "unknown".

use glam::Vec3;
use tacbot_core::BbKey;

use crate::aim::AimMode;
use crate::memory::TargetMemory;
use crate::perception::Candidate;
use crate::targeting::TargetingState;

pub const fn visible_enemies<A: 'static>() -> BbKey<Vec<Candidate<A>>> {
    BbKey::new("visible_enemies")
}

pub const fn visible_teammates<A: 'static>() -> BbKey<Vec<Candidate<A>>> {
    BbKey::new("visible_teammates")
}

pub const fn visible_items<A: 'static>() -> BbKey<Vec<Candidate<A>>> {
    BbKey::new("visible_items")
}

pub const fn target_memory<A: 'static>() -> BbKey<TargetMemory<A>> {
    BbKey::new("target_memory")
}

pub const fn targeting_state<A: 'static>() -> BbKey<TargetingState<A>> {
    BbKey::new("targeting_state")
}

/// Absent while the bot has no target.
pub const fn current_target<A: 'static>() -> BbKey<A> {
    BbKey::new("current_target")
}

pub const MOVE_DESTINATION: BbKey<Vec3> = BbKey::new("move_destination");
pub const AIM_POINT: BbKey<Vec3> = BbKey::new("aim_point");
pub const AIM_MODE: BbKey<AimMode> = BbKey::new("aim_mode");
/// Set while the reload loop waits for the weapon.
pub const RELOADING: BbKey<bool> = BbKey::new("reloading");
