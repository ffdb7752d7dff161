//! Reference host world for tests, benchmarks and demos.
//!
//! Flat ground on the XY plane inside a square arena, axis-aligned walls that block sight and
//! navigation targets, straight-line movement and magazine/reload timers. Every `shoot` and
//! `move_to` command is recorded. There is no damage model; callers kill actors explicitly.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use tacbot_core::{WorldMut, WorldView};

use crate::math::{FORWARD, UP};
use crate::world::{
    ActorKind, ActorSnapshot, ActorWorld, BotWorld, Hitbox, NavAgent, Team, TraceHit, TraceWorld,
    WeaponWorld,
};

pub type ActorId = u64;

/// Hit-volumes of a standing pawn: (name, offset from feet, half extents).
const HUMANOID: [(&str, [f32; 3], [f32; 3]); 11] = [
    ("pelvis", [0.0, 0.0, 95.0], [15.0, 20.0, 10.0]),
    ("spine_1", [0.0, 0.0, 112.0], [13.0, 18.0, 8.0]),
    ("spine_2", [0.0, 0.0, 128.0], [13.0, 19.0, 8.0]),
    ("spine_3", [0.0, 0.0, 144.0], [12.0, 20.0, 8.0]),
    ("head", [0.0, 0.0, 163.0], [10.0, 9.0, 11.0]),
    ("upperarm_l", [0.0, -26.0, 135.0], [6.0, 6.0, 15.0]),
    ("upperarm_r", [0.0, 26.0, 135.0], [6.0, 6.0, 15.0]),
    ("thigh_l", [0.0, -10.0, 68.0], [8.0, 8.0, 20.0]),
    ("thigh_r", [0.0, 10.0, 68.0], [8.0, 8.0, 20.0]),
    ("calf_l", [0.0, -10.0, 25.0], [7.0, 7.0, 22.0]),
    ("calf_r", [0.0, 10.0, 25.0], [7.0, 7.0, 22.0]),
];

/// Collision half-width of a pawn body for line traces.
const BODY_RADIUS: f32 = 24.0;
const ITEM_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub magazine: u32,
    pub capacity: u32,
    pub reload_seconds: f32,
    /// Minimum time between two shots.
    pub fire_interval_seconds: f32,
    pub reload_remaining: Option<f32>,
    pub cooldown_remaining: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            magazine: 30,
            capacity: 30,
            reload_seconds: 2.0,
            fire_interval_seconds: 0.1,
            reload_remaining: None,
            cooldown_remaining: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SandboxActor {
    pub position: Vec3,
    pub velocity: Vec3,
    pub eye_height: f32,
    pub eye_rotation: Quat,
    pub team: Team,
    pub alive: bool,
    pub kind: ActorKind,
    pub speed: f32,
    pub destination: Option<Vec3>,
    pub weapon: Weapon,
}

impl SandboxActor {
    fn pawn(team: Team, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            eye_height: 160.0,
            eye_rotation: Quat::IDENTITY,
            team,
            alive: true,
            kind: ActorKind::Pawn,
            speed: 300.0,
            destination: None,
            weapon: Weapon::default(),
        }
    }

    fn item(position: Vec3) -> Self {
        Self {
            eye_height: ITEM_RADIUS,
            kind: ActorKind::Item,
            team: Team(u16::MAX),
            speed: 0.0,
            weapon: Weapon {
                magazine: 0,
                capacity: 0,
                ..Weapon::default()
            },
            ..Self::pawn(Team(u16::MAX), position)
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + UP * self.eye_height
    }

    fn bounds(&self) -> (Vec3, Vec3) {
        let radius = match self.kind {
            ActorKind::Pawn => BODY_RADIUS,
            ActorKind::Item => ITEM_RADIUS,
        };
        (
            self.position - Vec3::new(radius, radius, 0.0),
            self.position + Vec3::new(radius, radius, self.eye_height + 15.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRecord {
    pub shooter: ActorId,
    pub at_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOrder {
    pub agent: ActorId,
    pub destination: Vec3,
    pub at_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct SandboxWorld {
    actors: BTreeMap<ActorId, SandboxActor>,
    walls: Vec<Wall>,
    half_extent: f32,
    time_seconds: f64,
    shots: Vec<ShotRecord>,
    move_orders: Vec<MoveOrder>,
    syncs: u64,
}

impl SandboxWorld {
    /// An empty square arena spanning `[-half_extent, half_extent]` on both ground axes.
    pub fn new(half_extent: f32) -> Self {
        Self {
            actors: BTreeMap::new(),
            walls: Vec::new(),
            half_extent,
            time_seconds: 0.0,
            shots: Vec::new(),
            move_orders: Vec::new(),
            syncs: 0,
        }
    }

    /// Spawn (or replace) a pawn standing at `position`.
    pub fn spawn_pawn(&mut self, id: ActorId, team: Team, position: Vec3) -> &mut SandboxActor {
        self.place(id, SandboxActor::pawn(team, position))
    }

    pub fn spawn_item(&mut self, id: ActorId, position: Vec3) -> &mut SandboxActor {
        self.place(id, SandboxActor::item(position))
    }

    fn place(&mut self, id: ActorId, actor: SandboxActor) -> &mut SandboxActor {
        match self.actors.entry(id) {
            Entry::Vacant(slot) => slot.insert(actor),
            Entry::Occupied(mut slot) => {
                slot.insert(actor);
                slot.into_mut()
            }
        }
    }

    pub fn despawn(&mut self, id: ActorId) -> Option<SandboxActor> {
        self.actors.remove(&id)
    }

    pub fn actor_state(&self, id: ActorId) -> Option<&SandboxActor> {
        self.actors.get(&id)
    }

    pub fn actor_state_mut(&mut self, id: ActorId) -> Option<&mut SandboxActor> {
        self.actors.get_mut(&id)
    }

    pub fn kill(&mut self, id: ActorId) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.alive = false;
            actor.velocity = Vec3::ZERO;
            actor.destination = None;
        }
    }

    /// Add a wall from ground level up to `height`, spanning the ground rectangle `min..max`.
    pub fn add_wall(&mut self, min: Vec3, max: Vec3, height: f32) {
        self.walls.push(Wall {
            min: Vec3::new(min.x.min(max.x), min.y.min(max.y), 0.0),
            max: Vec3::new(min.x.max(max.x), min.y.max(max.y), height),
        });
    }

    pub fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    pub fn shots(&self) -> &[ShotRecord] {
        &self.shots
    }

    pub fn shots_by(&self, shooter: ActorId) -> usize {
        self.shots.iter().filter(|s| s.shooter == shooter).count()
    }

    pub fn move_orders(&self) -> &[MoveOrder] {
        &self.move_orders
    }

    pub fn sync_count(&self) -> u64 {
        self.syncs
    }

    pub fn clear_records(&mut self) {
        self.shots.clear();
        self.move_orders.clear();
    }

    /// Advance movement and weapon timers by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for actor in self.actors.values_mut() {
            let weapon = &mut actor.weapon;
            weapon.cooldown_remaining = (weapon.cooldown_remaining - dt).max(0.0);
            if let Some(remaining) = weapon.reload_remaining {
                let remaining = remaining - dt;
                if remaining <= 1e-6 {
                    weapon.reload_remaining = None;
                    weapon.magazine = weapon.capacity;
                } else {
                    weapon.reload_remaining = Some(remaining);
                }
            }

            if !actor.alive {
                continue;
            }
            actor.velocity = match actor.destination {
                Some(dest) => {
                    let to = dest - actor.position;
                    let distance = to.length();
                    let max_step = actor.speed * dt;
                    if distance <= max_step || distance < 1e-3 {
                        actor.position = dest;
                        actor.destination = None;
                        Vec3::ZERO
                    } else {
                        let dir = to / distance;
                        actor.position += dir * max_step;
                        dir * actor.speed
                    }
                }
                None => Vec3::ZERO,
            };
        }
        self.time_seconds += f64::from(dt);
    }

    fn inside_wall(&self, point: Vec3) -> bool {
        self.walls.iter().any(|w| {
            point.x >= w.min.x && point.x <= w.max.x && point.y >= w.min.y && point.y <= w.max.y
        })
    }
}

/// Entry parameter along `from -> to` of the segment's first contact with an AABB.
fn segment_aabb(from: Vec3, to: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let dir = to - from;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;
    for axis in 0..3 {
        let origin = from[axis];
        let d = dir[axis];
        if d.abs() < 1e-8 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

impl WorldView for SandboxWorld {
    type Actor = ActorId;
}

impl WorldMut for SandboxWorld {}

impl ActorWorld for SandboxWorld {
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot> {
        self.actors.get(&id).map(|a| ActorSnapshot {
            position: a.position,
            eye_position: a.eye_position(),
            eye_rotation: a.eye_rotation,
            velocity: a.velocity,
            team: a.team,
            alive: a.alive,
            kind: a.kind,
        })
    }

    fn actors_within(&self, center: Vec3, radius: f32) -> Vec<ActorId> {
        let radius_sq = radius * radius;
        self.actors
            .iter()
            .filter(|(_, a)| a.position.distance_squared(center) <= radius_sq)
            .map(|(id, _)| *id)
            .collect()
    }

    fn hitboxes(&self, id: ActorId) -> Vec<Hitbox> {
        let Some(actor) = self.actors.get(&id) else {
            return Vec::new();
        };
        if actor.kind != ActorKind::Pawn {
            return Vec::new();
        }
        // Boxes turn with the pawn's yaw only.
        let forward = actor.eye_rotation * FORWARD;
        let rotation = Quat::from_rotation_z(forward.y.atan2(forward.x));
        HUMANOID
            .iter()
            .map(|(name, offset, half)| Hitbox {
                name: (*name).to_string(),
                center: actor.position + rotation * Vec3::from_array(*offset),
                rotation,
                half_extents: Vec3::from_array(*half),
            })
            .collect()
    }
}

impl TraceWorld for SandboxWorld {
    fn trace_line(&self, from: Vec3, to: Vec3, ignore: ActorId) -> TraceHit<ActorId> {
        let mut best: Option<(f32, Option<ActorId>)> = None;
        let mut consider = |t: f32, actor: Option<ActorId>| {
            if best.map_or(true, |(b, _)| t < b) {
                best = Some((t, actor));
            }
        };

        for wall in &self.walls {
            if let Some(t) = segment_aabb(from, to, wall.min, wall.max) {
                consider(t, None);
            }
        }
        for (id, actor) in &self.actors {
            if *id == ignore || !actor.alive {
                continue;
            }
            let (min, max) = actor.bounds();
            if let Some(t) = segment_aabb(from, to, min, max) {
                consider(t, Some(*id));
            }
        }

        match best {
            Some((t, actor)) => TraceHit {
                hit: true,
                actor,
                position: from.lerp(to, t),
            },
            None => TraceHit::clear(to),
        }
    }
}

impl NavAgent for SandboxWorld {
    fn move_to(&mut self, agent: ActorId, point: Vec3) {
        if let Some(actor) = self.actors.get_mut(&agent) {
            actor.destination = Some(point);
        }
        self.move_orders.push(MoveOrder {
            agent,
            destination: point,
            at_seconds: self.time_seconds,
        });
    }

    fn wish_velocity(&self, agent: ActorId) -> Vec3 {
        let Some(actor) = self.actors.get(&agent) else {
            return Vec3::ZERO;
        };
        match actor.destination {
            Some(dest) if actor.alive => {
                (dest - actor.position).normalize_or_zero() * actor.speed
            }
            _ => Vec3::ZERO,
        }
    }

    fn agent_position(&self, agent: ActorId) -> Option<Vec3> {
        self.actors.get(&agent).map(|a| a.position)
    }

    fn look_ahead(&self, agent: ActorId, distance: f32) -> Option<Vec3> {
        let actor = self.actors.get(&agent)?;
        let dest = actor.destination?;
        let to = dest - actor.position;
        let length = to.length();
        if length < 1e-3 {
            return None;
        }
        Some(actor.position + to / length * length.min(distance))
    }

    fn sync_agent(&mut self, _agent: ActorId, _position: Vec3, _velocity: Vec3) {
        // The sandbox pawn is its own navigation agent.
        self.syncs += 1;
    }

    fn nearest_navigable(&self, point: Vec3) -> Option<Vec3> {
        let h = self.half_extent;
        let clamped = Vec3::new(point.x.clamp(-h, h), point.y.clamp(-h, h), 0.0);
        (!self.inside_wall(clamped)).then_some(clamped)
    }
}

impl WeaponWorld for SandboxWorld {
    fn can_shoot(&self, agent: ActorId) -> bool {
        self.actors.get(&agent).is_some_and(|a| {
            a.alive
                && a.weapon.magazine > 0
                && a.weapon.reload_remaining.is_none()
                && a.weapon.cooldown_remaining <= 1e-6
        })
    }

    fn shoot(&mut self, agent: ActorId) {
        if !self.can_shoot(agent) {
            return;
        }
        if let Some(actor) = self.actors.get_mut(&agent) {
            actor.weapon.magazine -= 1;
            actor.weapon.cooldown_remaining = actor.weapon.fire_interval_seconds;
        }
        self.shots.push(ShotRecord {
            shooter: agent,
            at_seconds: self.time_seconds,
        });
    }

    fn is_reloading(&self, agent: ActorId) -> bool {
        self.actors
            .get(&agent)
            .is_some_and(|a| a.weapon.reload_remaining.is_some())
    }

    fn has_ammo(&self, agent: ActorId) -> bool {
        self.actors
            .get(&agent)
            .is_some_and(|a| a.weapon.magazine > 0)
    }

    fn start_reload(&mut self, agent: ActorId) {
        if let Some(actor) = self.actors.get_mut(&agent) {
            let weapon = &mut actor.weapon;
            if weapon.reload_remaining.is_none() && weapon.magazine < weapon.capacity {
                weapon.reload_remaining = Some(weapon.reload_seconds);
            }
        }
    }
}

impl BotWorld for SandboxWorld {
    fn set_eye_rotation(&mut self, agent: ActorId, rotation: Quat) {
        if let Some(actor) = self.actors.get_mut(&agent) {
            actor.eye_rotation = rotation;
        }
    }
}
