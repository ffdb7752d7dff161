//! Collaborator surfaces a bot reads from and issues commands to.
//!
//! The host game implements these; the bot never owns the state behind them. Movement, physics,
//! weapons and damage stay in the host, the bot only queries snapshots and sends orders.

use glam::{Quat, Vec3};
use tacbot_core::{WorldMut, WorldView};

use crate::math::FORWARD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Team(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Pawn,
    Item,
}

/// Live state of one actor, read fresh every time it is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSnapshot {
    pub position: Vec3,
    pub eye_position: Vec3,
    pub eye_rotation: Quat,
    pub velocity: Vec3,
    pub team: Team,
    pub alive: bool,
    pub kind: ActorKind,
}

impl ActorSnapshot {
    pub fn eye_forward(&self) -> Vec3 {
        self.eye_rotation * FORWARD
    }

    /// Point between feet and eyes, used for aim-cone checks.
    pub fn center_mass(&self) -> Vec3 {
        self.position.lerp(self.eye_position, 0.5)
    }
}

/// A named hit-volume in world space: an oriented box.
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    pub name: String,
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

/// Result of a line trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit<A> {
    pub hit: bool,
    /// Root actor struck by the trace, if it hit one.
    pub actor: Option<A>,
    pub position: Vec3,
}

impl<A: PartialEq> TraceHit<A> {
    pub fn clear(position: Vec3) -> Self {
        Self {
            hit: false,
            actor: None,
            position,
        }
    }

    /// The trace reached `target`: nothing was in the way, or the first thing hit was `target`.
    pub fn reaches(&self, target: A) -> bool {
        !self.hit || self.actor.as_ref() == Some(&target)
    }
}

pub trait ActorWorld: WorldView {
    fn actor(&self, id: Self::Actor) -> Option<ActorSnapshot>;

    /// Actors whose position lies within `radius` of `center`, in a deterministic order.
    fn actors_within(&self, center: Vec3, radius: f32) -> Vec<Self::Actor>;

    fn hitboxes(&self, id: Self::Actor) -> Vec<Hitbox>;
}

pub trait TraceWorld: WorldView {
    /// Trace from `from` to `to`, ignoring `ignore` and everything attached to it.
    fn trace_line(&self, from: Vec3, to: Vec3, ignore: Self::Actor) -> TraceHit<Self::Actor>;
}

/// Navigation agent attached to a bot. Path-finding and steering live behind this trait.
pub trait NavAgent: WorldMut {
    fn move_to(&mut self, agent: Self::Actor, point: Vec3);

    fn wish_velocity(&self, agent: Self::Actor) -> Vec3;

    fn agent_position(&self, agent: Self::Actor) -> Option<Vec3>;

    /// Point `distance` ahead along the current path, if the agent has one.
    fn look_ahead(&self, agent: Self::Actor, distance: f32) -> Option<Vec3>;

    /// Re-align the agent with the pawn's physical position and velocity.
    fn sync_agent(&mut self, agent: Self::Actor, position: Vec3, velocity: Vec3);

    /// Project a point onto the navigable surface.
    fn nearest_navigable(&self, point: Vec3) -> Option<Vec3>;
}

pub trait WeaponWorld: WorldMut {
    fn can_shoot(&self, agent: Self::Actor) -> bool;

    fn shoot(&mut self, agent: Self::Actor);

    fn is_reloading(&self, agent: Self::Actor) -> bool;

    fn has_ammo(&self, agent: Self::Actor) -> bool;

    fn start_reload(&mut self, agent: Self::Actor);
}

/// Everything a bot needs from the host.
pub trait BotWorld: ActorWorld + TraceWorld + NavAgent + WeaponWorld + 'static {
    fn set_eye_rotation(&mut self, agent: Self::Actor, rotation: Quat);
}
