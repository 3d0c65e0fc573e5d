//! Angle conversions, random ranges and rotations in the XZ plane.
//!
//! All rotations about the Y axis use the handedness of
//! `Quat::from_rotation_y`, so a mesh whose yaw is rotated by `a` degrees and
//! a point rotated by [`rotate_point_xz`] with the same `a` stay in sync.

pub mod ray;

use bevy::math::{EulerRot, Quat, Vec2, Vec3};
use rand::Rng;

pub use ray::{LocalHit, Ray};

pub fn deg_to_rad(deg: f32) -> f32 {
    deg.to_radians()
}

pub fn rad_to_deg(rad: f32) -> f32 {
    rad.to_degrees()
}

/// Uniform random value in `[min, max]`; `min` when the range is empty or unbounded
pub fn random_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Rotate a point of the XZ plane (`Vec2 { x, y: z }`) around `pivot`
pub fn rotate_point_xz(point: Vec2, pivot: Vec2, angle_deg: f32) -> Vec2 {
    let (sin, cos) = deg_to_rad(angle_deg).sin_cos();
    let dx = point.x - pivot.x;
    let dz = point.y - pivot.y;
    Vec2::new(
        pivot.x + dx * cos + dz * sin,
        pivot.y - dx * sin + dz * cos,
    )
}

/// [`rotate_point_xz`] for a 3D point, leaving its height untouched
pub fn rotate_vec3_around_pivot_xz(point: Vec3, pivot: Vec2, angle_deg: f32) -> Vec3 {
    let rotated = rotate_point_xz(Vec2::new(point.x, point.z), pivot, angle_deg);
    Vec3::new(rotated.x, point.y, rotated.y)
}

/// Yaw between two points on the XZ plane.
///
/// Staircase flights are laid out axis-aligned and rely on this being zero;
/// it does not derive a heading from the points yet.
pub fn angle_between_points_xz(_from: Vec2, _to: Vec2) -> f32 {
    0.0
}

/// Rotation from Euler angles in degrees (yaw applied first, then pitch, then roll)
pub fn euler_deg_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        deg_to_rad(rotation.y),
        deg_to_rad(rotation.x),
        deg_to_rad(rotation.z),
    )
}

/// Yaw rotation about the Y axis in degrees
pub fn yaw_quat(angle_deg: f32) -> Quat {
    Quat::from_rotation_y(deg_to_rad(angle_deg))
}
