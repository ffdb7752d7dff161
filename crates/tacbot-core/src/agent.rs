use core::fmt::Debug;
use core::hash::Hash;

/// Stable identifier for an actor (bot, player pawn or item) in the host world.
///
/// Bots key their target memory and blackboard facts by this id, so it must:
/// - order deterministically (`Ord`), so ties between equally good targets resolve the same way
///   on every replay
/// - map to a stable number (`stable_id`) used for RNG seeding and log fields
pub trait AgentId: Copy + Ord + Eq + Hash + Debug + 'static {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        u64::from(self)
    }
}
