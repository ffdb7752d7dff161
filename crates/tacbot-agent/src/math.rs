use glam::{Quat, Vec3};
use tacbot_core::DeterministicRng;

/// Local forward axis of an eye rotation.
pub const FORWARD: Vec3 = Vec3::X;
/// World up axis; the ground plane is XY.
pub const UP: Vec3 = Vec3::Z;

/// Rotation that points `FORWARD` along `direction`, or `None` for a zero direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }
    Some(Quat::from_rotation_arc(FORWARD, dir))
}

/// Frame-rate independent blend factor for a lerp running at `rate` per second.
///
/// Two steps of `dt` close the same share of the gap as one step of `2 * dt`.
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Uniform point in the axis-aligned cube `[-1, 1]^3`.
pub fn random_in_unit_cube<R: DeterministicRng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.next_f32_signed(),
        rng.next_f32_signed(),
        rng.next_f32_signed(),
    )
}

/// Uniform point on the ground-plane disk of `radius` around the origin.
pub fn random_in_disk<R: DeterministicRng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let angle = rng.next_f32_unit() * std::f32::consts::TAU;
    let r = radius * rng.next_f32_unit().sqrt();
    Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
}
