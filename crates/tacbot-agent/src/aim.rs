//! Simulated aim: weighted hit-volume sampling, spread, reaction lag and turn-rate limited
//! rotation.

use glam::Vec3;
use tacbot_bt::{BtNode, NodeResult};
use tacbot_core::{AgentId, Blackboard, BotError, CancelScope, DeterministicRng, Result, SplitMix64, TickContext};
use tacbot_tools::{emit, TraceEvent};

use crate::config::AimConfig;
use crate::keys;
use crate::math::{blend_factor, look_rotation, random_in_unit_cube};
use crate::movement::movement_heading;
use crate::world::{BotWorld, Hitbox};

const AIM_STREAM: u64 = 0xA1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimMode {
    TrackingTarget,
    /// Target unseen for longer than the grace period; aim follows the bot's own heading.
    FollowingHeading,
}

/// Sampling table over a target's hit-volumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitboxWeights {
    entries: Vec<(String, f32)>,
    total: f32,
}

impl HitboxWeights {
    pub fn new(entries: Vec<(String, f32)>) -> Self {
        let total = entries.iter().map(|(_, w)| w.max(0.0)).sum();
        Self { entries, total }
    }

    /// Table for `hitboxes`, weighting names from the config and everything else by the default.
    pub fn for_hitboxes(hitboxes: &[Hitbox], config: &AimConfig) -> Self {
        Self::new(
            hitboxes
                .iter()
                .map(|hb| {
                    let weight = config
                        .hitbox_weights
                        .get(&hb.name)
                        .copied()
                        .unwrap_or(config.default_hitbox_weight);
                    (hb.name.clone(), weight)
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(name, _)| name.as_str())
    }

    /// Probability of drawing `name`, or `None` if it is not in the table.
    pub fn probability(&self, name: &str) -> Option<f32> {
        if self.total <= 0.0 {
            return None;
        }
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| w.max(0.0) / self.total)
    }

    /// Index of a hit-volume drawn by cumulative-weight scan; `None` if every weight is zero.
    pub fn sample<R: DeterministicRng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.total <= 0.0 {
            return None;
        }
        let roll = rng.next_f32_unit() * self.total;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (i, (_, weight)) in self.entries.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(i);
            if roll < cumulative {
                return Some(i);
            }
        }
        // f32 rounding can leave `roll` a hair above the accumulated sum.
        last_positive
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSolution {
    pub point: Vec3,
    pub mode: AimMode,
}

/// Per-target aim state. Rebuilt whenever the target changes, kept otherwise.
#[derive(Debug, Clone)]
pub struct AimSimulator<A> {
    config: AimConfig,
    target: Option<A>,
    weights: HitboxWeights,
    sampled_offset: Vec3,
    applied_offset: Vec3,
    tracked_position: Vec3,
    next_resample_at: f64,
}

impl<A: AgentId> AimSimulator<A> {
    pub fn new(config: AimConfig) -> Self {
        Self {
            config,
            target: None,
            weights: HitboxWeights::default(),
            sampled_offset: Vec3::ZERO,
            applied_offset: Vec3::ZERO,
            tracked_position: Vec3::ZERO,
            next_resample_at: 0.0,
        }
    }

    pub fn target(&self) -> Option<A> {
        self.target
    }

    pub fn weights(&self) -> &HitboxWeights {
        &self.weights
    }

    /// Where to aim this tick. `None` when the target no longer exists.
    ///
    /// `memory_age` is how long ago the target was last seen; past the grace period (or when it
    /// is not remembered at all) the solution follows the bot's movement heading instead.
    pub fn solve<W, R>(
        &mut self,
        ctx: &TickContext,
        agent: A,
        world: &W,
        target: A,
        memory_age: Option<f32>,
        rng: &mut R,
    ) -> Result<Option<AimSolution>>
    where
        W: BotWorld<Actor = A>,
        R: DeterministicRng + ?Sized,
    {
        let Some(snapshot) = world.actor(target) else {
            return Ok(None);
        };
        let now = ctx.time_seconds();

        if self.target != Some(target) {
            self.target = Some(target);
            self.weights = HitboxWeights::for_hitboxes(&world.hitboxes(target), &self.config);
            self.sampled_offset = self.sample_offset(world, target, snapshot.position, rng);
            self.applied_offset = self.sampled_offset;
            self.tracked_position = snapshot.position;
            self.next_resample_at = now + f64::from(self.config.resample_interval_seconds);
        }

        let unseen_for = memory_age.unwrap_or(f32::INFINITY);
        if unseen_for > self.config.lost_sight_grace_seconds {
            let me = world
                .actor(agent)
                .ok_or(BotError::MissingActor(agent.stable_id()))?;
            let point = self.heading_point(world, agent, me.position, me.eye_position, me.eye_forward());
            return Ok(Some(AimSolution {
                point,
                mode: AimMode::FollowingHeading,
            }));
        }

        if now + 1e-6 >= self.next_resample_at {
            self.sampled_offset = self.sample_offset(world, target, snapshot.position, rng);
            self.next_resample_at = now + f64::from(self.config.resample_interval_seconds);
        }

        let dt = ctx.dt_seconds;
        self.applied_offset = self.applied_offset.lerp(
            self.sampled_offset,
            blend_factor(self.config.local_aim_rate, dt),
        );
        self.tracked_position = self.tracked_position.lerp(
            snapshot.position,
            blend_factor(self.config.track_rate * self.config.reaction_bias, dt),
        );

        Ok(Some(AimSolution {
            point: self.tracked_position + self.applied_offset,
            mode: AimMode::TrackingTarget,
        }))
    }

    /// A point inside a sampled hit-volume plus spread, relative to the target's position.
    fn sample_offset<W, R>(&self, world: &W, target: A, target_position: Vec3, rng: &mut R) -> Vec3
    where
        W: BotWorld<Actor = A>,
        R: DeterministicRng + ?Sized,
    {
        let hitboxes = world.hitboxes(target);
        let point = match self
            .weights
            .sample(rng)
            .and_then(|i| self.weights.name(i))
            .and_then(|name| hitboxes.iter().find(|hb| hb.name == name))
        {
            Some(hb) => hb.center + hb.rotation * (random_in_unit_cube(rng) * hb.half_extents),
            None => world
                .actor(target)
                .map_or(target_position, |s| s.center_mass()),
        };
        let spread = self.config.max_inaccuracy * (1.0 - self.config.accuracy);
        point + random_in_unit_cube(rng) * spread - target_position
    }

    fn heading_point<W>(&self, world: &W, agent: A, position: Vec3, eye: Vec3, forward: Vec3) -> Vec3
    where
        W: BotWorld<Actor = A>,
    {
        let distance = self.config.look_ahead_distance;
        let dir = movement_heading(world, agent, position, distance).unwrap_or(forward);
        eye + dir * distance
    }
}

/// Keeps the bot's eyes on its current target, or on its heading once the target is lost.
///
/// Runs for as long as a target exists; fails when there is none.
pub struct AimAtTarget<A> {
    simulator: AimSimulator<A>,
    turn_rate: f32,
    rng: Option<SplitMix64>,
    mode: Option<AimMode>,
}

impl<A: AgentId> AimAtTarget<A> {
    pub fn new(config: AimConfig) -> Self {
        Self {
            turn_rate: config.turn_rate,
            simulator: AimSimulator::new(config),
            rng: None,
            mode: None,
        }
    }

    pub fn mode(&self) -> Option<AimMode> {
        self.mode
    }

    pub fn simulator(&self) -> &AimSimulator<A> {
        &self.simulator
    }
}

impl<W: BotWorld> BtNode<W> for AimAtTarget<W::Actor> {
    fn name(&self) -> &str {
        "AimAtTarget"
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
        let me = world
            .actor(agent)
            .ok_or(BotError::MissingActor(agent.stable_id()))?;
        let age = blackboard
            .get(keys::target_memory::<W::Actor>())
            .and_then(|m| m.age_of(target));

        let rng = self
            .rng
            .get_or_insert_with(|| ctx.rng_for_agent(agent, AIM_STREAM));
        let Some(solution) = self.simulator.solve(ctx, agent, &*world, target, age, rng)? else {
            return Ok(NodeResult::Failure);
        };

        if let Some(desired) = look_rotation(solution.point - me.eye_position) {
            let t = blend_factor(self.turn_rate, ctx.dt_seconds);
            let rotation = me.eye_rotation.slerp(desired, t).normalize();
            world.set_eye_rotation(agent, rotation);
        }

        if self.mode != Some(solution.mode) {
            if solution.mode == AimMode::FollowingHeading {
                tracing::debug!(
                    agent = agent.stable_id(),
                    target = target.stable_id(),
                    "target out of sight, aiming along heading"
                );
                emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "aim.follow_heading")
                        .with_subject(target.stable_id()),
                );
            }
            self.mode = Some(solution.mode);
        }
        blackboard.set(keys::AIM_POINT, solution.point);
        blackboard.set(keys::AIM_MODE, solution.mode);
        Ok(NodeResult::Running)
    }

    fn reset(&mut self) {
        self.mode = None;
    }
}
