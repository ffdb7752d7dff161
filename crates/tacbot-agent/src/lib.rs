//! Shooter-bot brains: perception, target memory and selection, simulated aim, burst fire,
//! combat and roam behaviors, and the per-tick [`BotController`].
//!
//! The host game implements the collaborator traits in [`world`]; [`sandbox::SandboxWorld`] is a
//! small reference implementation.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod aim;
pub mod combat;
pub mod config;
pub mod controller;
pub mod keys;
pub mod math;
pub mod memory;
pub mod movement;
pub mod perception;
pub mod roam;
pub mod sandbox;
pub mod shooting;
pub mod targeting;
pub mod world;

pub use aim::{AimAtTarget, AimMode, AimSimulator, AimSolution, HitboxWeights};
pub use combat::{build_combat, ValidateTarget};
pub use config::{
    AimConfig, BotConfig, ControllerConfig, MemoryConfig, MovementConfig, PerceptionConfig,
    ShootingConfig, TargetingConfig,
};
pub use controller::BotController;
pub use memory::{MemoryEntry, TargetMemory};
pub use movement::{EngageMovement, LookAlongHeading, Wander};
pub use perception::{Candidate, Perception};
pub use roam::{build_roam, WatchForTarget};
pub use shooting::{BurstFire, Reload, ShootTarget, ShotFired};
pub use targeting::{Targeting, TargetingState};
pub use world::{
    ActorKind, ActorSnapshot, ActorWorld, BotWorld, Hitbox, NavAgent, Team, TraceHit, TraceWorld,
    WeaponWorld,
};
