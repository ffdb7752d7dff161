use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tacbot_core::{BotError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PerceptionConfig {
    /// Maximum distance at which other actors are considered at all.
    pub range: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self { range: 1500.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MemoryConfig {
    /// Entries not seen for longer than this are forgotten.
    pub prune_after_seconds: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            prune_after_seconds: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TargetingConfig {
    /// Minimum time a target is held before a better candidate may replace it.
    pub switch_hysteresis_seconds: f32,
    /// How often combat re-validates its target. Zero checks every tick.
    pub validation_interval_seconds: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            switch_hysteresis_seconds: 5.0,
            validation_interval_seconds: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AimConfig {
    /// 1.0 aims at a point inside the sampled hitbox; lower values widen the spread.
    pub accuracy: f32,
    /// Spread half-size (world units) at zero accuracy.
    pub max_inaccuracy: f32,
    /// How often a new point on the target is sampled.
    pub resample_interval_seconds: f32,
    /// Rate of the slow "muscle memory" blend toward the sampled point.
    pub local_aim_rate: f32,
    /// Rate at which the tracked position follows the target.
    pub track_rate: f32,
    /// Reaction-speed multiplier applied to `track_rate`.
    pub reaction_bias: f32,
    /// After this long without seeing the target, aim follows the movement heading instead.
    pub lost_sight_grace_seconds: f32,
    /// Rate at which the eye rotation blends toward the desired rotation.
    pub turn_rate: f32,
    /// Distance along the path used to derive the movement heading.
    pub look_ahead_distance: f32,
    pub hitbox_weights: BTreeMap<String, f32>,
    /// Weight for hit-volumes missing from `hitbox_weights`.
    pub default_hitbox_weight: f32,
}

/// Sampling weights favouring torso and head.
pub const DEFAULT_HITBOX_WEIGHTS: [(&str, f32); 5] = [
    ("pelvis", 0.2),
    ("spine_1", 0.3),
    ("spine_2", 0.4),
    ("spine_3", 0.5),
    ("head", 0.6),
];

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            accuracy: 0.75,
            max_inaccuracy: 24.0,
            resample_interval_seconds: 0.6,
            local_aim_rate: 2.5,
            track_rate: 8.0,
            reaction_bias: 1.0,
            lost_sight_grace_seconds: 1.0,
            turn_rate: 10.0,
            look_ahead_distance: 200.0,
            hitbox_weights: DEFAULT_HITBOX_WEIGHTS
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect(),
            default_hitbox_weight: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ShootingConfig {
    pub burst_min: u32,
    pub burst_max: u32,
    /// Minimum gap between the last shot of a burst and the first shot of the next.
    pub burst_break_seconds: f32,
    /// Minimum gap between shots inside a burst.
    pub shot_interval_seconds: f32,
    /// Cosine of the aim cone half-angle required to fire.
    pub aim_cone_cos: f32,
    /// Suspend the reload loop until the weapon finishes reloading.
    pub wait_for_reload: bool,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            burst_min: 2,
            burst_max: 5,
            burst_break_seconds: 0.4,
            shot_interval_seconds: 0.1,
            aim_cone_cos: 0.85,
            wait_for_reload: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MovementConfig {
    /// How often combat picks a new destination near the target.
    pub reposition_interval_seconds: f32,
    /// Radius of the random offset around a recently seen target.
    pub engage_offset_radius: f32,
    pub wander_radius: f32,
    /// Wander destinations are renewed after this long even if not reached.
    pub wander_duration_seconds: f32,
    pub arrival_distance: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            reposition_interval_seconds: 1.5,
            engage_offset_radius: 150.0,
            wander_radius: 1200.0,
            wander_duration_seconds: 8.0,
            arrival_distance: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ControllerConfig {
    /// Time budget of one pass of the outer combat/roam loop before it is restarted.
    pub iteration_budget_seconds: f32,
    /// Pause after an unexpected fault before the loop restarts.
    pub fault_backoff_seconds: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            iteration_budget_seconds: 30.0,
            fault_backoff_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BotConfig {
    pub perception: PerceptionConfig,
    pub memory: MemoryConfig,
    pub targeting: TargetingConfig,
    pub aim: AimConfig,
    pub shooting: ShootingConfig,
    pub movement: MovementConfig,
    pub controller: ControllerConfig,
}

impl BotConfig {
    pub fn validate(&self) -> Result<()> {
        positive("perception.range", self.perception.range)?;
        positive("memory.prune_after_seconds", self.memory.prune_after_seconds)?;
        non_negative(
            "targeting.switch_hysteresis_seconds",
            self.targeting.switch_hysteresis_seconds,
        )?;
        non_negative(
            "targeting.validation_interval_seconds",
            self.targeting.validation_interval_seconds,
        )?;

        let aim = &self.aim;
        if !(aim.accuracy > 0.0 && aim.accuracy <= 1.0) {
            return Err(invalid(format!(
                "aim.accuracy must be in (0, 1], got {}",
                aim.accuracy
            )));
        }
        non_negative("aim.max_inaccuracy", aim.max_inaccuracy)?;
        positive("aim.resample_interval_seconds", aim.resample_interval_seconds)?;
        positive("aim.local_aim_rate", aim.local_aim_rate)?;
        positive("aim.track_rate", aim.track_rate)?;
        positive("aim.reaction_bias", aim.reaction_bias)?;
        non_negative("aim.lost_sight_grace_seconds", aim.lost_sight_grace_seconds)?;
        positive("aim.turn_rate", aim.turn_rate)?;
        positive("aim.look_ahead_distance", aim.look_ahead_distance)?;
        non_negative("aim.default_hitbox_weight", aim.default_hitbox_weight)?;
        for (name, weight) in &aim.hitbox_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(invalid(format!(
                    "aim.hitbox_weights[{name}] must be a finite non-negative weight, got {weight}"
                )));
            }
        }

        let shooting = &self.shooting;
        if shooting.burst_min == 0 || shooting.burst_min > shooting.burst_max {
            return Err(invalid(format!(
                "shooting burst range [{}, {}] must be non-empty and start above zero",
                shooting.burst_min, shooting.burst_max
            )));
        }
        non_negative("shooting.burst_break_seconds", shooting.burst_break_seconds)?;
        non_negative("shooting.shot_interval_seconds", shooting.shot_interval_seconds)?;
        if !(-1.0..=1.0).contains(&shooting.aim_cone_cos) {
            return Err(invalid(format!(
                "shooting.aim_cone_cos must be a cosine, got {}",
                shooting.aim_cone_cos
            )));
        }

        let movement = &self.movement;
        positive(
            "movement.reposition_interval_seconds",
            movement.reposition_interval_seconds,
        )?;
        non_negative("movement.engage_offset_radius", movement.engage_offset_radius)?;
        positive("movement.wander_radius", movement.wander_radius)?;
        positive(
            "movement.wander_duration_seconds",
            movement.wander_duration_seconds,
        )?;
        positive("movement.arrival_distance", movement.arrival_distance)?;

        positive(
            "controller.iteration_budget_seconds",
            self.controller.iteration_budget_seconds,
        )?;
        non_negative(
            "controller.fault_backoff_seconds",
            self.controller.fault_backoff_seconds,
        )?;
        Ok(())
    }
}

fn invalid(message: String) -> BotError {
    BotError::InvalidConfig(message)
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be finite and > 0, got {value}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be finite and >= 0, got {value}")))
    }
}
