use crate::{rng, AgentId, SplitMix64};

/// One fixed simulation step as seen by a bot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }

    /// Simulation time at the start of this tick, assuming a fixed step.
    pub fn time_seconds(&self) -> f64 {
        self.tick as f64 * f64::from(self.dt_seconds)
    }

    /// Number of whole ticks covering `seconds` (at least one for any positive duration).
    pub fn ticks_for(&self, seconds: f32) -> u64 {
        if seconds <= 0.0 || self.dt_seconds <= 0.0 {
            return 0;
        }
        // Absorb f32 noise so that e.g. 0.3s at 0.1s steps is 3 ticks, not 4.
        ((seconds / self.dt_seconds) - 1e-3).ceil().max(1.0) as u64
    }

    /// The tick at which something started now and lasting `seconds` expires.
    pub fn deadline_after(&self, seconds: f32) -> u64 {
        self.tick.saturating_add(self.ticks_for(seconds))
    }
}
