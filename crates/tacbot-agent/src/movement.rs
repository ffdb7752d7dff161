use glam::Vec3;
use tacbot_bt::{BtNode, NodeResult};
use tacbot_core::{AgentId, Blackboard, BotError, CancelScope, Result, SplitMix64, TickContext};

use crate::config::{AimConfig, MovementConfig};
use crate::keys;
use crate::math::{blend_factor, flatten, look_rotation, random_in_disk};
use crate::world::BotWorld;

const ENGAGE_STREAM: u64 = 0xE0;
const WANDER_STREAM: u64 = 0xE1;
/// Navigable-point attempts per wander renewal.
const WANDER_ATTEMPTS: usize = 8;
/// Roaming turns at this fraction of the combat turn rate.
const LOOSE_TURN_FACTOR: f32 = 0.5;

/// Heading from the navigation path, falling back to the wish velocity. `None` when standing still.
pub(crate) fn movement_heading<W: BotWorld>(
    world: &W,
    agent: W::Actor,
    position: Vec3,
    look_ahead_distance: f32,
) -> Option<Vec3> {
    world
        .look_ahead(agent, look_ahead_distance)
        .map(|p| flatten(p - position))
        .and_then(Vec3::try_normalize)
        .or_else(|| flatten(world.wish_velocity(agent)).try_normalize())
}

/// Combat movement around the current target.
///
/// While the target was seen recently the bot moves to a random navigable point near it, picked
/// again every `reposition_interval`. Once the target has been out of sight longer than the grace
/// period the bot heads for its last known position instead. No orders are issued while a waiting
/// reload holds `keys::RELOADING`.
pub struct EngageMovement {
    config: MovementConfig,
    lost_sight_grace_seconds: f32,
    next_reposition_at: Option<f64>,
    chasing_last_known: bool,
    rng: Option<SplitMix64>,
}

impl EngageMovement {
    pub fn new(config: MovementConfig, aim: &AimConfig) -> Self {
        Self {
            config,
            lost_sight_grace_seconds: aim.lost_sight_grace_seconds,
            next_reposition_at: None,
            chasing_last_known: false,
            rng: None,
        }
    }
}

impl<W: BotWorld> BtNode<W> for EngageMovement {
    fn name(&self) -> &str {
        "EngageMovement"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        let Some(target) = blackboard.get(keys::current_target::<W::Actor>()).copied() else {
            return Ok(NodeResult::Failure);
        };
        let Some(entry) = blackboard
            .get(keys::target_memory::<W::Actor>())
            .and_then(|m| m.get(target))
            .copied()
        else {
            return Ok(NodeResult::Failure);
        };

        if blackboard.get(keys::RELOADING).copied().unwrap_or(false) {
            return Ok(NodeResult::Running);
        }

        let now = ctx.time_seconds();
        let chase = entry.age_seconds > self.lost_sight_grace_seconds;
        let due = self.next_reposition_at.map_or(true, |at| now + 1e-6 >= at);
        if !due && chase == self.chasing_last_known {
            return Ok(NodeResult::Running);
        }

        let destination = if chase {
            world
                .nearest_navigable(entry.last_position)
                .unwrap_or(entry.last_position)
        } else {
            let around = world
                .actor(target)
                .map_or(entry.last_position, |s| s.position);
            let rng = self
                .rng
                .get_or_insert_with(|| ctx.rng_for_agent(agent, ENGAGE_STREAM));
            let offset = random_in_disk(rng, self.config.engage_offset_radius);
            match world
                .nearest_navigable(around + offset)
                .or_else(|| world.nearest_navigable(around))
            {
                Some(point) => point,
                None => return Ok(NodeResult::Running),
            }
        };

        if chase && !self.chasing_last_known {
            tracing::debug!(
                agent = agent.stable_id(),
                target = target.stable_id(),
                "target out of sight, moving to last known position"
            );
        }
        self.chasing_last_known = chase;
        self.next_reposition_at = Some(now + f64::from(self.config.reposition_interval_seconds));
        world.move_to(agent, destination);
        blackboard.set(keys::MOVE_DESTINATION, destination);
        Ok(NodeResult::Running)
    }

    fn reset(&mut self) {
        self.next_reposition_at = None;
        self.chasing_last_known = false;
    }
}

/// Roams between random navigable points around the bot.
pub struct Wander {
    config: MovementConfig,
    destination: Option<Vec3>,
    renew_at: f64,
    rng: Option<SplitMix64>,
}

impl Wander {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            destination: None,
            renew_at: 0.0,
            rng: None,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl<W: BotWorld> BtNode<W> for Wander {
    fn name(&self) -> &str {
        "Wander"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        let position = world
            .agent_position(agent)
            .or_else(|| world.actor(agent).map(|s| s.position))
            .ok_or(BotError::MissingActor(agent.stable_id()))?;
        let now = ctx.time_seconds();

        let arrived = self.destination.is_some_and(|d| {
            flatten(d - position).length() <= self.config.arrival_distance
        });
        if self.destination.is_some() && !arrived && now + 1e-6 < self.renew_at {
            return Ok(NodeResult::Running);
        }

        let rng = self
            .rng
            .get_or_insert_with(|| ctx.rng_for_agent(agent, WANDER_STREAM));
        let radius = self.config.wander_radius;
        let picked = (0..WANDER_ATTEMPTS)
            .find_map(|_| world.nearest_navigable(position + random_in_disk(rng, radius)));

        if let Some(point) = picked {
            tracing::trace!(agent = agent.stable_id(), x = point.x, y = point.y, "wandering");
            world.move_to(agent, point);
            blackboard.set(keys::MOVE_DESTINATION, point);
            self.destination = Some(point);
            self.renew_at = now + f64::from(self.config.wander_duration_seconds);
        }
        Ok(NodeResult::Running)
    }

    fn reset(&mut self) {
        self.destination = None;
        self.renew_at = 0.0;
    }
}

/// Turns the bot's eyes loosely toward where it is walking.
pub struct LookAlongHeading {
    turn_rate: f32,
    look_ahead_distance: f32,
}

impl LookAlongHeading {
    pub fn new(aim: &AimConfig) -> Self {
        Self {
            turn_rate: aim.turn_rate * LOOSE_TURN_FACTOR,
            look_ahead_distance: aim.look_ahead_distance,
        }
    }
}

impl<W: BotWorld> BtNode<W> for LookAlongHeading {
    fn name(&self) -> &str {
        "LookAlongHeading"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        _blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        let me = world
            .actor(agent)
            .ok_or(BotError::MissingActor(agent.stable_id()))?;
        let desired = movement_heading(&*world, agent, me.position, self.look_ahead_distance)
            .and_then(look_rotation);
        if let Some(desired) = desired {
            let t = blend_factor(self.turn_rate, ctx.dt_seconds);
            world.set_eye_rotation(agent, me.eye_rotation.slerp(desired, t).normalize());
        }
        Ok(NodeResult::Running)
    }

    fn reset(&mut self) {}
}
