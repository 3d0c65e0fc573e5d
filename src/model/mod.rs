//! Compound models.
//!
//! A [`Model`] exclusively owns a group of meshes. The group can be bound
//! under one synthetic parent body (compounded) so it moves as one rigid
//! piece, and later be taken apart again one mesh at a time (shot-offs) or
//! all at once when its owner is destroyed.
//!
//! ```text
//! Unbound --compound()--> Compounded --shot_off_mesh()--> Compounded (fewer members)
//!                              |
//!                              +--remove_compound_parent()--> Unbound
//! any --dispose()--> Disposed
//! ```
//!
//! Exactly one impostor exists per mesh at any time: member impostors are
//! detached while compounded and restored from the snapshot on release.

pub mod split;

use bevy::math::{Quat, Vec2, Vec3};
use tracing::{debug, warn};

use crate::constants::DEFAULT_DYNAMIC_MASS;
use crate::math::ray::Ray;
use crate::math::{rotate_vec3_around_pivot_xz, yaw_quat};
use crate::mesh::{Mesh, MeshFactory, MeshId};
use crate::physics::{ImpostorParams, ImpostorShape, PhysicSet, RigidBodyBackend};

/// Ray intersection with one mesh of a model, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    pub mesh: MeshId,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    meshes: Vec<Mesh>,
    compound: Option<Mesh>,
    /// Per-member impostor snapshot taken when compounding, index-aligned with `meshes`
    impostors: Option<Vec<Option<ImpostorParams>>>,
    enable_single_shot_offs: bool,
    physic_set: Option<PhysicSet>,
}

impl Model {
    pub fn new(meshes: Vec<Mesh>, physic_set: Option<PhysicSet>) -> Self {
        Self {
            meshes,
            compound: None,
            impostors: None,
            enable_single_shot_offs: false,
            physic_set,
        }
    }

    pub fn with_single_shot_offs(mut self, enable: bool) -> Self {
        self.enable_single_shot_offs = enable;
        self
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|m| m.id == id)
    }

    pub fn mesh_index(&self, id: MeshId) -> Option<usize> {
        self.meshes.iter().position(|m| m.id == id)
    }

    pub fn contains_mesh(&self, id: MeshId) -> bool {
        self.mesh_index(id).is_some()
    }

    pub fn compound_mesh(&self) -> Option<&Mesh> {
        self.compound.as_ref()
    }

    pub fn is_compounded(&self) -> bool {
        self.compound.is_some()
    }

    pub fn impostors(&self) -> Option<&[Option<ImpostorParams>]> {
        self.impostors.as_deref()
    }

    pub fn enable_single_shot_offs(&self) -> bool {
        self.enable_single_shot_offs
    }

    pub fn physic_set(&self) -> Option<PhysicSet> {
        self.physic_set
    }

    /// World position and rotation of a member mesh
    pub fn world_transform(&self, mesh: &Mesh) -> (Vec3, Quat) {
        match (&self.compound, mesh.parent) {
            (Some(parent), Some(parent_id)) if parent.id == parent_id => (
                parent.position + parent.rotation * mesh.position,
                parent.rotation * mesh.rotation,
            ),
            _ => (mesh.position, mesh.rotation),
        }
    }

    /// Current impostor parameters of every member, `None` where a mesh has no body
    pub fn extract_physics_impostors(
        &self,
        physics: &dyn RigidBodyBackend,
    ) -> Vec<Option<ImpostorParams>> {
        self.meshes.iter().map(|m| physics.params(m.id)).collect()
    }

    /// Bind all members under a zero-size parent at `position` carrying one synthetic body
    pub fn compound(
        &mut self,
        factory: &mut MeshFactory,
        physics: &mut dyn RigidBodyBackend,
        position: Vec3,
    ) {
        if self.compound.is_some() {
            warn!("model is already compounded");
            return;
        }

        self.impostors = Some(self.extract_physics_impostors(physics));

        let parent = factory.create_empty(position);
        for mesh in &mut self.meshes {
            physics.detach(mesh.id);
            mesh.position -= position;
            mesh.parent = Some(parent.id);
        }
        physics.attach(
            parent.id,
            PhysicSet::Synthetic.impostor(ImpostorShape::Box, false),
        );
        debug!(parent = %parent.id, members = self.meshes.len(), "compounded model");
        self.compound = Some(parent);
    }

    /// Release one member from the compound parent if single shot-offs are enabled
    pub fn shot_off_mesh(&mut self, physics: &mut dyn RigidBodyBackend, mesh: MeshId) -> bool {
        if !self.enable_single_shot_offs {
            return false;
        }
        match self.mesh_index(mesh) {
            Some(index) => self.release_member(physics, index),
            None => false,
        }
    }

    /// Release every member and drop the compound parent
    pub fn remove_compound_parent(&mut self, physics: &mut dyn RigidBodyBackend) {
        if self.compound.is_none() {
            return;
        }
        for index in 0..self.meshes.len() {
            self.release_member(physics, index);
        }
        if let Some(mut parent) = self.compound.take() {
            physics.detach(parent.id);
            parent.dispose();
        }
        self.impostors = None;
    }

    fn release_member(&mut self, physics: &mut dyn RigidBodyBackend, index: usize) -> bool {
        let Some(parent) = &self.compound else {
            return false;
        };
        let (parent_id, parent_position, parent_rotation) =
            (parent.id, parent.position, parent.rotation);

        let snapshot = self
            .impostors
            .as_ref()
            .and_then(|impostors| impostors.get(index).copied().flatten());

        let mesh = &mut self.meshes[index];
        if mesh.parent != Some(parent_id) || mesh.is_disposed() {
            return false;
        }

        mesh.position = parent_position + parent_rotation * mesh.position;
        mesh.rotation = parent_rotation * mesh.rotation;
        mesh.parent = None;

        let params = snapshot.unwrap_or_else(|| {
            PhysicSet::Synthetic.impostor(ImpostorShape::for_mesh_shape(&mesh.shape), false)
        });
        physics.attach(mesh.id, params);
        physics.force_sync(mesh.id);
        true
    }

    /// Independent copy with fresh mesh ids, no impostors and no compound state
    pub fn clone_model(&self, factory: &mut MeshFactory, physic_set: Option<PhysicSet>) -> Model {
        let meshes = self
            .meshes
            .iter()
            .filter(|m| !m.is_disposed())
            .map(|m| {
                let (position, rotation) = self.world_transform(m);
                factory.clone_mesh(m, position, rotation)
            })
            .collect();
        Model::new(meshes, physic_set).with_single_shot_offs(self.enable_single_shot_offs)
    }

    /// Give every zero-mass body a real mass so it falls. Returns the number of bodies changed.
    pub fn remove_static_state(&mut self, physics: &mut dyn RigidBodyBackend) -> usize {
        let mass = self
            .physic_set
            .map(|set| set.weight())
            .unwrap_or(DEFAULT_DYNAMIC_MASS);

        let mut changed = 0;
        for mesh in &mut self.meshes {
            let is_static = physics.params(mesh.id).is_some_and(|p| p.is_static());
            if is_static {
                physics.set_mass(mesh.id, mass);
                physics.force_sync(mesh.id);
                mesh.pivot = Vec3::ZERO;
                changed += 1;
            }
        }
        changed
    }

    fn body_ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes
            .iter()
            .map(|m| m.id)
            .chain(self.compound.iter().map(|c| c.id))
    }

    /// Damp linear and angular velocity of sphere bodies
    pub fn mitigate_sphere_velocities(&self, physics: &mut dyn RigidBodyBackend) {
        for id in self.body_ids() {
            let is_sphere = physics
                .params(id)
                .is_some_and(|p| p.shape == ImpostorShape::Sphere);
            if is_sphere {
                physics.damp_linear_velocity(id);
                physics.damp_angular_velocity(id);
            }
        }
    }

    pub fn lower_linear_velocity(&self, physics: &mut dyn RigidBodyBackend) {
        for id in self.body_ids() {
            physics.damp_linear_velocity(id);
        }
    }

    pub fn lower_angular_velocity(&self, physics: &mut dyn RigidBodyBackend) {
        for id in self.body_ids() {
            physics.damp_angular_velocity(id);
        }
    }

    /// Move all root meshes (unparented members and the compound parent)
    pub fn translate(&mut self, delta: Vec3) {
        for mesh in self.meshes.iter_mut().filter(|m| m.parent.is_none()) {
            mesh.position += delta;
        }
        if let Some(parent) = &mut self.compound {
            parent.position += delta;
        }
    }

    /// Rotate all root meshes around a pivot on the XZ plane
    pub fn rotate_around_pivot_xz(&mut self, pivot: Vec2, angle_deg: f32) {
        let yaw = yaw_quat(angle_deg);
        let roots = self
            .meshes
            .iter_mut()
            .filter(|m| m.parent.is_none())
            .chain(self.compound.iter_mut());
        for mesh in roots {
            mesh.position = rotate_vec3_around_pivot_xz(mesh.position, pivot, angle_deg);
            mesh.rotation = yaw * mesh.rotation;
        }
    }

    pub fn set_darken(&mut self, alpha: f32) {
        for mesh in &mut self.meshes {
            mesh.darken = alpha;
        }
    }

    /// All intersections of `ray` with live primitive members within `max_distance`
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Vec<MeshHit> {
        self.meshes
            .iter()
            .filter(|m| !m.is_disposed() && m.is_primitive())
            .filter_map(|m| {
                let (position, rotation) = self.world_transform(m);
                let local = ray.to_local(position, rotation);
                let hit = m.shape.raycast_local(&local)?;
                if hit.distance > max_distance {
                    return None;
                }
                Some(MeshHit {
                    mesh: m.id,
                    point: ray.at(hit.distance),
                    normal: (rotation * hit.normal).normalize_or_zero(),
                    distance: hit.distance,
                })
            })
            .collect()
    }

    /// Release every body and mark all meshes disposed
    pub fn dispose(&mut self, physics: &mut dyn RigidBodyBackend) {
        for mesh in &mut self.meshes {
            physics.detach(mesh.id);
            mesh.dispose();
        }
        if let Some(mut parent) = self.compound.take() {
            physics.detach(parent.id);
            parent.dispose();
        }
        self.impostors = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.meshes.iter().all(|m| m.is_disposed())
    }
}
