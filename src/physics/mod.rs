//! Physics profiles and the rigid body backend seam.
//!
//! The compound/decompound and damage logic only talks to
//! [`RigidBodyBackend`]. [`BodyRegistry`] is the in-memory implementation the
//! stage runs on; [`rapier`] maps its records onto `bevy_rapier3d` components.

pub mod rapier;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::VELOCITY_DAMPING;
use crate::mesh::{MeshId, MeshShape};

/// Physics profile of a mesh: how heavy, grippy and bouncy it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicSet {
    Concrete,
    SolidWood,
    Glass,
    Furniture,
    Crate,
    Bullet,
    /// Profile of compound parents and of members restored without a snapshot
    Synthetic,
}

impl PhysicSet {
    /// Mass of a dynamic body with this profile
    pub fn weight(&self) -> f32 {
        match self {
            Self::Concrete => 5.0,
            Self::SolidWood => 2.0,
            Self::Glass => 0.5,
            Self::Furniture => 1.5,
            Self::Crate => 1.0,
            Self::Bullet => 0.1,
            Self::Synthetic => 1.0,
        }
    }

    pub fn friction(&self) -> f32 {
        match self {
            Self::Concrete => 0.8,
            Self::SolidWood => 0.6,
            Self::Glass => 0.2,
            Self::Furniture => 0.6,
            Self::Crate => 0.5,
            Self::Bullet => 0.5,
            Self::Synthetic => 0.5,
        }
    }

    pub fn restitution(&self) -> f32 {
        match self {
            Self::Concrete => 0.1,
            Self::SolidWood => 0.2,
            Self::Glass => 0.1,
            Self::Furniture => 0.1,
            Self::Crate => 0.2,
            Self::Bullet => 0.5,
            Self::Synthetic => 0.0,
        }
    }

    /// Impostor parameters for a body of this profile; static bodies have zero mass
    pub fn impostor(&self, shape: ImpostorShape, is_static: bool) -> ImpostorParams {
        ImpostorParams {
            shape,
            mass: if is_static { 0.0 } else { self.weight() },
            friction: self.friction(),
            restitution: self.restitution(),
        }
    }
}

/// Collision shape of an impostor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpostorShape {
    Box,
    Sphere,
    Cylinder,
    Plane,
    Mesh,
}

impl ImpostorShape {
    pub fn for_mesh_shape(shape: &MeshShape) -> Self {
        match shape {
            MeshShape::Box { .. } | MeshShape::Empty => Self::Box,
            MeshShape::Sphere { .. } => Self::Sphere,
            MeshShape::Cylinder { .. } => Self::Cylinder,
            MeshShape::Plane { .. } => Self::Plane,
            MeshShape::Polygon { .. } => Self::Mesh,
        }
    }
}

/// Snapshot of an impostor: everything needed to rebuild it later
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpostorParams {
    pub shape: ImpostorShape,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl ImpostorParams {
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

/// Physics binding requested from the mesh factory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicBody {
    pub set: PhysicSet,
    pub is_static: bool,
}

impl PhysicBody {
    pub fn fixed(set: PhysicSet) -> Self {
        Self {
            set,
            is_static: true,
        }
    }

    pub fn dynamic(set: PhysicSet) -> Self {
        Self {
            set,
            is_static: false,
        }
    }
}

/// Narrow interface onto the physics engine.
///
/// At most one impostor exists per mesh; attaching to a mesh that already
/// has one replaces it.
pub trait RigidBodyBackend {
    fn attach(&mut self, mesh: MeshId, params: ImpostorParams);
    fn detach(&mut self, mesh: MeshId) -> Option<ImpostorParams>;
    fn params(&self, mesh: MeshId) -> Option<ImpostorParams>;
    fn set_mass(&mut self, mesh: MeshId, mass: f32);
    fn linear_velocity(&self, mesh: MeshId) -> Vec3;
    fn set_linear_velocity(&mut self, mesh: MeshId, velocity: Vec3);
    fn angular_velocity(&self, mesh: MeshId) -> Vec3;
    fn set_angular_velocity(&mut self, mesh: MeshId, velocity: Vec3);
    fn apply_impulse(&mut self, mesh: MeshId, impulse: Vec3, at: Vec3);
    /// Make the solver pick up manual state changes of this body immediately
    fn force_sync(&mut self, mesh: MeshId);

    fn has_impostor(&self, mesh: MeshId) -> bool {
        self.params(mesh).is_some()
    }

    /// Scale linear velocity by [`VELOCITY_DAMPING`]
    fn damp_linear_velocity(&mut self, mesh: MeshId) {
        let velocity = self.linear_velocity(mesh);
        self.set_linear_velocity(mesh, velocity * VELOCITY_DAMPING);
    }

    /// Scale angular velocity by [`VELOCITY_DAMPING`]
    fn damp_angular_velocity(&mut self, mesh: MeshId) {
        let velocity = self.angular_velocity(mesh);
        self.set_angular_velocity(mesh, velocity * VELOCITY_DAMPING);
    }
}

/// State of one body tracked by [`BodyRegistry`]
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub params: ImpostorParams,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub total_impulse: Vec3,
    pub sync_count: u32,
}

impl BodyState {
    fn new(params: ImpostorParams) -> Self {
        Self {
            params,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            total_impulse: Vec3::ZERO,
            sync_count: 0,
        }
    }
}

/// In-memory rigid body bookkeeping keyed by mesh
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: HashMap<MeshId, BodyState>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, mesh: MeshId) -> Option<&BodyState> {
        self.bodies.get(&mesh)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MeshId, &BodyState)> {
        self.bodies.iter()
    }
}

impl RigidBodyBackend for BodyRegistry {
    fn attach(&mut self, mesh: MeshId, params: ImpostorParams) {
        self.bodies.insert(mesh, BodyState::new(params));
    }

    fn detach(&mut self, mesh: MeshId) -> Option<ImpostorParams> {
        self.bodies.remove(&mesh).map(|body| body.params)
    }

    fn params(&self, mesh: MeshId) -> Option<ImpostorParams> {
        self.bodies.get(&mesh).map(|body| body.params)
    }

    fn set_mass(&mut self, mesh: MeshId, mass: f32) {
        if let Some(body) = self.bodies.get_mut(&mesh) {
            body.params.mass = mass;
        }
    }

    fn linear_velocity(&self, mesh: MeshId) -> Vec3 {
        self.bodies
            .get(&mesh)
            .map(|body| body.linear_velocity)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_linear_velocity(&mut self, mesh: MeshId, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&mesh) {
            body.linear_velocity = velocity;
        }
    }

    fn angular_velocity(&self, mesh: MeshId) -> Vec3 {
        self.bodies
            .get(&mesh)
            .map(|body| body.angular_velocity)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_angular_velocity(&mut self, mesh: MeshId, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&mesh) {
            body.angular_velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, mesh: MeshId, impulse: Vec3, _at: Vec3) {
        if let Some(body) = self.bodies.get_mut(&mesh) {
            body.total_impulse += impulse;
            if body.params.mass > 0.0 {
                body.linear_velocity += impulse / body.params.mass;
            }
        }
    }

    fn force_sync(&mut self, mesh: MeshId) {
        if let Some(body) = self.bodies.get_mut(&mesh) {
            body.sync_count += 1;
        }
    }
}
