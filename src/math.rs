//! Small vector and scalar helpers shared by every simulation module.
//!
//! Positions and velocities are `glam::Vec2` in logical arena units
//! (origin top-left, +y down).

use glam::Vec2;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn lerp(from: f32, to: f32, alpha: f32) -> f32 {
    from + (to - from) * alpha
}

/// Move `current` toward `target` by at most `delta`, never overshooting.
pub fn approach(current: f32, target: f32, delta: f32) -> f32 {
    if current < target {
        (current + delta).min(target)
    } else {
        (current - delta).max(target)
    }
}

/// Unit vector in the direction of `v`, or zero for a zero-length input.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len == 0.0 {
        Vec2::ZERO
    } else {
        v / len
    }
}

pub fn from_angle(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * magnitude
}

/// Angle of the vector from `a` to `b`, in radians.
pub fn angle_to(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.y.atan2(d.x)
}

pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

/// Circle overlap without a square root: `|a - b|² <= (ra + rb)²`.
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let radii = ra + rb;
    distance_squared(a, b) <= radii * radii
}

/// Clamp `pos` so a circle of `radius` stays inside a `size` arena.
pub fn clamp_to_arena(pos: Vec2, radius: f32, size: Vec2) -> Vec2 {
    Vec2::new(
        clamp(pos.x, radius, size.x - radius),
        clamp(pos.y, radius, size.y - radius),
    )
}
