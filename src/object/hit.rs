use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::Ray;
use crate::mesh::{MeshId, ObjectId};

/// A fired shot: a damage-carrying ray with limited range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub source: Vec3,
    /// Normalized
    pub direction: Vec3,
    pub range: f32,
    pub damage: f32,
}

impl Shot {
    pub fn new(source: Vec3, direction: Vec3, range: f32, damage: f32) -> Self {
        Self {
            source,
            direction: direction.normalize_or_zero(),
            range,
            damage,
        }
    }

    pub fn ray(&self) -> Ray {
        Ray::new(self.source, self.direction)
    }
}

/// One ray/mesh intersection, driving damage and impact effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPoint {
    pub point: Vec3,
    pub mesh: MeshId,
    pub normal: Vec3,
    /// Direction for ricochet effects. Currently the surface normal, not a
    /// reflection of the shot direction.
    pub mirrored_direction: Vec3,
    pub distance: f32,
    pub direction: Vec3,
    pub object: ObjectId,
}
