use std::collections::BTreeMap;

use glam::Vec3;

/// What the bot remembers about one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryEntry {
    /// Seconds since the enemy was last seen; zero on the tick it was seen.
    pub age_seconds: f32,
    pub last_position: Vec3,
}

/// Enemies seen recently, keyed by actor id.
///
/// Entries age every perception pass and are pruned once older than `prune_after_seconds`. The
/// map is ordered so iteration, and with it target selection, is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMemory<A> {
    entries: BTreeMap<A, MemoryEntry>,
    prune_after_seconds: f32,
}

impl<A: Ord + Copy> TargetMemory<A> {
    pub fn new(prune_after_seconds: f32) -> Self {
        Self {
            entries: BTreeMap::new(),
            prune_after_seconds,
        }
    }

    pub fn prune_after_seconds(&self) -> f32 {
        self.prune_after_seconds
    }

    pub fn age_all(&mut self, dt_seconds: f32) {
        for entry in self.entries.values_mut() {
            entry.age_seconds += dt_seconds;
        }
    }

    /// Record a sighting at `position`, resetting the age.
    pub fn refresh(&mut self, actor: A, position: Vec3) {
        self.entries.insert(
            actor,
            MemoryEntry {
                age_seconds: 0.0,
                last_position: position,
            },
        );
    }

    /// Drop entries older than the prune threshold, returning the forgotten actors.
    pub fn prune(&mut self) -> Vec<A> {
        let limit = self.prune_after_seconds;
        let expired: Vec<A> = self
            .entries
            .iter()
            .filter(|(_, e)| e.age_seconds > limit)
            .map(|(a, _)| *a)
            .collect();
        for actor in &expired {
            self.entries.remove(actor);
        }
        expired
    }

    pub fn forget(&mut self, actor: A) -> Option<MemoryEntry> {
        self.entries.remove(&actor)
    }

    pub fn get(&self, actor: A) -> Option<&MemoryEntry> {
        self.entries.get(&actor)
    }

    pub fn age_of(&self, actor: A) -> Option<f32> {
        self.entries.get(&actor).map(|e| e.age_seconds)
    }

    pub fn contains(&self, actor: A) -> bool {
        self.entries.contains_key(&actor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (A, &MemoryEntry)> + '_ {
        self.entries.iter().map(|(a, e)| (*a, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
