//! Mesh handles and primitive geometry.
//!
//! A [`Mesh`] is the engine-side description of one renderable, pickable
//! primitive: its shape, transform, optional parent, texture and display
//! state. Rendering itself happens elsewhere.

pub mod factory;
pub mod ids;

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::ray::{self, LocalHit, Ray};

pub use factory::{Anchor, MeshFactory, MeshOptions};
pub use ids::{IdAllocator, MeshId, ObjectId};

/// Texture reference by asset name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Texture(pub String);

impl Texture {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Geometry of a mesh in its local frame, centered on the mesh position
/// except for polygons (see [`MeshShape::local_center`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshShape {
    Box { size: Vec3 },
    /// Horizontal rectangle (x = width, z = depth)
    Plane { width: f32, depth: f32 },
    /// Horizontal polygon, outline in XZ relative to the mesh position
    Polygon { outline: Vec<Vec2> },
    Cylinder { diameter: f32, height: f32 },
    Sphere { diameter: f32 },
    /// Zero-size node used as compound parent
    Empty,
}

impl MeshShape {
    /// Local half extents of the shape's bounding box
    pub fn half_extents(&self) -> Vec3 {
        match self {
            Self::Box { size } => *size / 2.0,
            Self::Plane { width, depth } => Vec3::new(width / 2.0, 0.0, depth / 2.0),
            Self::Polygon { outline } => {
                let (min, max) = outline_bounds(outline);
                let half = (max - min) / 2.0;
                Vec3::new(half.x, 0.0, half.y)
            }
            Self::Cylinder { diameter, height } => {
                Vec3::new(diameter / 2.0, height / 2.0, diameter / 2.0)
            }
            Self::Sphere { diameter } => Vec3::splat(diameter / 2.0),
            Self::Empty => Vec3::ZERO,
        }
    }

    /// Center of the bounding box in the local frame. Only polygons can be
    /// off-center: their outline is relative to the outline origin.
    pub fn local_center(&self) -> Vec3 {
        match self {
            Self::Polygon { outline } => {
                let (min, max) = outline_bounds(outline);
                let mid = (min + max) / 2.0;
                Vec3::new(mid.x, 0.0, mid.y)
            }
            _ => Vec3::ZERO,
        }
    }

    /// Ray test in the shape's local frame
    pub fn raycast_local(&self, local_ray: &Ray) -> Option<LocalHit> {
        match self {
            Self::Box { size } => ray::intersect_box(local_ray, *size / 2.0),
            Self::Plane { width, depth } => {
                ray::intersect_plane(local_ray, width / 2.0, depth / 2.0)
            }
            Self::Polygon { outline } => ray::intersect_polygon(local_ray, outline),
            Self::Cylinder { diameter, height } => {
                ray::intersect_cylinder(local_ray, diameter / 2.0, height / 2.0)
            }
            Self::Sphere { diameter } => ray::intersect_sphere(local_ray, diameter / 2.0),
            Self::Empty => None,
        }
    }
}

fn outline_bounds(outline: &[Vec2]) -> (Vec2, Vec2) {
    if outline.is_empty() {
        return (Vec2::ZERO, Vec2::ZERO);
    }
    outline.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    )
}

/// One primitive mesh.
///
/// `position` is the center of the shape; while `parent` is set, position
/// and rotation are relative to the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub id: MeshId,
    pub shape: MeshShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub pivot: Vec3,
    pub parent: Option<MeshId>,
    pub texture: Option<Texture>,
    pub reverse_texture_x: bool,
    /// 0.0 = original colors, 1.0 = black
    pub darken: f32,
    pub show_collisions: bool,
    pub show_bounding_box: bool,
    disposed: bool,
}

impl Mesh {
    pub fn new(id: MeshId, shape: MeshShape, position: Vec3, rotation: Quat) -> Self {
        Self {
            id,
            shape,
            position,
            rotation,
            pivot: Vec3::ZERO,
            parent: None,
            texture: None,
            reverse_texture_x: false,
            darken: 0.0,
            show_collisions: false,
            show_bounding_box: false,
            disposed: false,
        }
    }

    /// Renderable geometry, as opposed to a compound node
    pub fn is_primitive(&self) -> bool {
        !matches!(self.shape, MeshShape::Empty)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.parent = None;
    }

    /// World-space min/max corners for a mesh placed at `position` with `rotation`
    pub fn bounds_at(&self, position: Vec3, rotation: Quat) -> (Vec3, Vec3) {
        let half = self.shape.half_extents();
        let center = self.shape.local_center();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = position + rotation * (center + half * Vec3::new(sx, sy, sz));
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }
        (min, max)
    }

    /// World-space bounds of an unparented mesh
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.bounds_at(self.position, self.rotation)
    }
}
