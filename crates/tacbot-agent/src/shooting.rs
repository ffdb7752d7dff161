use tacbot_bt::{BtNode, NodeResult};
use tacbot_core::{AgentId, Blackboard, BotError, CancelScope, DeterministicRng, Result, SplitMix64, TickContext};
use tacbot_tools::{emit, TraceEvent};

use crate::config::ShootingConfig;
use crate::keys;
use crate::world::BotWorld;

const BURST_STREAM: u64 = 0xB0;
/// Tolerance for comparing tick-derived times against interval boundaries.
const TIME_EPSILON: f64 = 1e-6;

/// A shot allowed by [`BurstFire::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotFired {
    pub burst_size: u32,
    /// 1-based position of the shot within its burst.
    pub shot_in_burst: u32,
}

impl ShotFired {
    pub fn starts_burst(&self) -> bool {
        self.shot_in_burst == 1
    }

    pub fn ends_burst(&self) -> bool {
        self.shot_in_burst == self.burst_size
    }
}

/// Burst-fire pacing.
///
/// A burst size is drawn once per burst from `[burst_min, burst_max]`. Inside a burst shots are at
/// least `shot_interval` apart; after the last shot of a burst the next burst may not start before
/// `burst_break` has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstFire {
    config: ShootingConfig,
    shots_fired: u32,
    burst_size: u32,
    last_shot_at: Option<f64>,
    burst_ended_at: Option<f64>,
}

impl BurstFire {
    pub fn new(config: ShootingConfig) -> Self {
        Self {
            config,
            shots_fired: 0,
            burst_size: 0,
            last_shot_at: None,
            burst_ended_at: None,
        }
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Size of the burst in progress; zero between bursts.
    pub fn burst_size(&self) -> u32 {
        self.burst_size
    }

    pub fn in_burst(&self) -> bool {
        self.burst_size > 0
    }

    /// Advance to time `now`. `ready` is whether every external gate (sight, aim, weapon) is open.
    pub fn step<R: DeterministicRng + ?Sized>(
        &mut self,
        now: f64,
        ready: bool,
        rng: &mut R,
    ) -> Option<ShotFired> {
        if !ready {
            return None;
        }

        if self.burst_size == 0 {
            if let Some(ended) = self.burst_ended_at {
                if now + TIME_EPSILON < ended + f64::from(self.config.burst_break_seconds) {
                    return None;
                }
            }
            self.burst_size = rng.next_u32_inclusive(self.config.burst_min, self.config.burst_max);
            self.shots_fired = 0;
        } else if let Some(last) = self.last_shot_at {
            if now + TIME_EPSILON < last + f64::from(self.config.shot_interval_seconds) {
                return None;
            }
        }

        self.shots_fired += 1;
        self.last_shot_at = Some(now);
        let shot = ShotFired {
            burst_size: self.burst_size,
            shot_in_burst: self.shots_fired,
        };
        if self.shots_fired >= self.burst_size {
            self.shots_fired = 0;
            self.burst_size = 0;
            self.burst_ended_at = Some(now);
        }
        Some(shot)
    }
}

/// Fires at the current target in bursts whenever it is visible and inside the aim cone.
///
/// Holds fire while `keys::RELOADING` is set by a waiting [`Reload`].
///
/// Never settles on its own. The burst state lives as long as the node, so a combat restart does
/// not skip the break between bursts.
pub struct ShootTarget {
    aim_cone_cos: f32,
    burst: BurstFire,
    rng: Option<SplitMix64>,
}

impl ShootTarget {
    pub fn new(config: ShootingConfig) -> Self {
        Self {
            aim_cone_cos: config.aim_cone_cos,
            burst: BurstFire::new(config),
            rng: None,
        }
    }

    pub fn burst(&self) -> &BurstFire {
        &self.burst
    }
}

impl<W: BotWorld> BtNode<W> for ShootTarget {
    fn name(&self) -> &str {
        "ShootTarget"
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
        let Some(enemy) = world.actor(target) else {
            return Ok(NodeResult::Failure);
        };

        let aim_at = enemy.center_mass();
        let visible = world
            .trace_line(me.eye_position, aim_at, agent)
            .reaches(target);
        let aligned = visible
            && me
                .eye_forward()
                .dot((aim_at - me.eye_position).normalize_or_zero())
                >= self.aim_cone_cos;
        let holding = blackboard.get(keys::RELOADING).copied().unwrap_or(false);
        let ready = aligned && !holding && !world.is_reloading(agent) && world.can_shoot(agent);

        let rng = self
            .rng
            .get_or_insert_with(|| ctx.rng_for_agent(agent, BURST_STREAM));
        if let Some(shot) = self.burst.step(ctx.time_seconds(), ready, rng) {
            world.shoot(agent);
            if shot.starts_burst() {
                tracing::trace!(
                    agent = agent.stable_id(),
                    target = target.stable_id(),
                    burst = shot.burst_size,
                    "burst started"
                );
                emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "shoot.burst")
                        .with_subject(target.stable_id())
                        .with_detail(u64::from(shot.burst_size)),
                );
            }
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "shoot")
                    .with_subject(target.stable_id())
                    .with_detail(u64::from(shot.shot_in_burst)),
            );
        }
        Ok(NodeResult::Running)
    }

    fn reset(&mut self) {}
}

/// Reload loop running alongside shooting.
///
/// Starts a reload whenever the weapon is empty and not already reloading. With
/// `wait_for_reload` the loop holds `keys::RELOADING` until the weapon reports the reload done,
/// which suspends shooting and combat movement for that long.
#[derive(Debug, Clone)]
pub struct Reload {
    wait_for_reload: bool,
    waiting: bool,
}

impl Reload {
    pub fn new(config: ShootingConfig) -> Self {
        Self {
            wait_for_reload: config.wait_for_reload,
            waiting: false,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }
}

impl<W: BotWorld> BtNode<W> for Reload {
    fn name(&self) -> &str {
        "Reload"
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Actor,
        world: &mut W,
        blackboard: &mut Blackboard,
        _scope: &CancelScope,
    ) -> Result<NodeResult> {
        if self.waiting {
            if world.is_reloading(agent) {
                return Ok(NodeResult::Running);
            }
            self.waiting = false;
            blackboard.set(keys::RELOADING, false);
        }

        if !world.is_reloading(agent) && !world.has_ammo(agent) {
            world.start_reload(agent);
            tracing::trace!(agent = agent.stable_id(), "reloading");
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "reload").with_subject(agent.stable_id()),
            );
            if self.wait_for_reload {
                self.waiting = true;
                blackboard.set(keys::RELOADING, true);
            }
        }
        Ok(NodeResult::Running)
    }

    fn on_cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Actor,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<()> {
        if self.waiting {
            blackboard.remove(keys::RELOADING);
        }
        self.waiting = false;
        Ok(())
    }

    fn reset(&mut self) {
        self.waiting = false;
    }
}
