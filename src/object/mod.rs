//! Destructible game objects.
//!
//! Every placed object owns a [`Model`] and an energy budget. Walls and
//! doors share the destructible behaviour and differ only in their
//! [`ObjectKind`] payload.
//!
//! Energy only ever decreases. The first time it reaches zero the object is
//! destroyed: its compound is broken up, static bodies start falling and the
//! hit mesh may be split in two.

pub mod door;
pub mod event;
pub mod hit;
pub mod wall;

use bevy::math::{Vec2, Vec3};
use tracing::{debug, info};

use crate::constants::{MAX_DARKEN_RATIO, SPLIT_IMPULSE_PER_DAMAGE, UNBREAKABLE};
use crate::mesh::{MeshFactory, MeshId, ObjectId};
use crate::model::Model;
use crate::physics::RigidBodyBackend;

pub use door::{Door, DoorAnimation, DoorState, Hinge};
pub use event::{Event, EventKind};
pub use hit::{HitPoint, Shot};
pub use wall::{Interaction, InteractionType};

/// Remaining energy of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Durability {
    Unbreakable,
    Breakable { initial: f32, current: f32 },
}

impl Durability {
    /// `UNBREAKABLE` (or any negative energy) makes the object indestructible
    pub fn from_energy(energy: f32) -> Self {
        if energy == UNBREAKABLE || energy < 0.0 {
            Self::Unbreakable
        } else {
            Self::Breakable {
                initial: energy,
                current: energy,
            }
        }
    }

    /// Current energy, `UNBREAKABLE` for indestructible objects
    pub fn energy(&self) -> f32 {
        match self {
            Self::Unbreakable => UNBREAKABLE,
            Self::Breakable { current, .. } => *current,
        }
    }

    pub fn is_unbreakable(&self) -> bool {
        matches!(self, Self::Unbreakable)
    }
}

/// What distinguishes the object beyond being destructible
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Wall(Interaction),
    Door(Door),
    /// Free-standing prop without interaction
    Movable,
}

/// Why a hit did not change anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Unbreakable,
    AlreadyDestroyed,
    NoDamage,
}

/// Result of [`GameObject::hurt`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HurtOutcome {
    Ignored(IgnoreReason),
    Damaged { energy: f32 },
    /// Energy reached zero; carries the ids of the split halves if the hit mesh was cut
    Destroyed { split: Option<[MeshId; 2]> },
}

/// Impact decal on an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletHole {
    pub id: MeshId,
    pub target: MeshId,
    pub point: Vec3,
    pub normal: Vec3,
    pub z_index: u32,
}

#[derive(Debug, Clone)]
pub struct GameObject {
    id: ObjectId,
    model: Model,
    durability: Durability,
    destroyed: bool,
    darken_meshes_on_energy_loss: bool,
    split_hit_mesh_on_energy_loss: bool,
    next_bullet_hole_z_index: u32,
    bullet_holes: Vec<BulletHole>,
    kind: ObjectKind,
}

impl GameObject {
    pub fn new(id: ObjectId, model: Model, energy: f32, kind: ObjectKind) -> Self {
        Self {
            id,
            model,
            durability: Durability::from_energy(energy),
            destroyed: false,
            darken_meshes_on_energy_loss: false,
            split_hit_mesh_on_energy_loss: false,
            next_bullet_hole_z_index: 0,
            bullet_holes: Vec::new(),
            kind,
        }
    }

    pub fn wall(id: ObjectId, model: Model, energy: f32, interaction: Interaction) -> Self {
        Self::new(id, model, energy, ObjectKind::Wall(interaction))
    }

    /// Door object; the leaf's current pose becomes its closed pose
    pub fn door(id: ObjectId, model: Model, energy: f32, mut door: Door) -> Self {
        door.capture_closed_pose(&model);
        Self::new(id, model, energy, ObjectKind::Door(door))
    }

    pub fn movable(id: ObjectId, model: Model, energy: f32) -> Self {
        Self::new(id, model, energy, ObjectKind::Movable)
    }

    pub fn with_darken_on_energy_loss(mut self, enable: bool) -> Self {
        self.darken_meshes_on_energy_loss = enable;
        self
    }

    pub fn with_split_on_energy_loss(mut self, enable: bool) -> Self {
        self.split_hit_mesh_on_energy_loss = enable;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    pub fn door_state(&self) -> Option<&Door> {
        match &self.kind {
            ObjectKind::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn door_mut(&mut self) -> Option<&mut Door> {
        match &mut self.kind {
            ObjectKind::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    pub fn energy(&self) -> f32 {
        self.durability.energy()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn bullet_holes(&self) -> &[BulletHole] {
        &self.bullet_holes
    }

    /// Apply `damage` from a hit on this object
    pub fn hurt(
        &mut self,
        factory: &mut MeshFactory,
        physics: &mut dyn RigidBodyBackend,
        damage: f32,
        hit: &HitPoint,
    ) -> HurtOutcome {
        let (initial, current) = match &mut self.durability {
            Durability::Unbreakable => {
                debug!(object = %self.id, "hit on unbreakable object ignored");
                return HurtOutcome::Ignored(IgnoreReason::Unbreakable);
            }
            _ if self.destroyed => {
                debug!(object = %self.id, "hit on destroyed object ignored");
                return HurtOutcome::Ignored(IgnoreReason::AlreadyDestroyed);
            }
            _ if damage.is_nan() || damage <= 0.0 => {
                debug!(object = %self.id, damage, "hit without damage ignored");
                return HurtOutcome::Ignored(IgnoreReason::NoDamage);
            }
            Durability::Breakable { initial, current } => {
                *current = (*current - damage).max(0.0);
                (*initial, *current)
            }
        };

        if self.darken_meshes_on_energy_loss {
            let lost = if initial > 0.0 {
                1.0 - current / initial
            } else {
                1.0
            };
            self.model.set_darken(MAX_DARKEN_RATIO * lost);
        }

        self.model.shot_off_mesh(physics, hit.mesh);

        if current > 0.0 {
            return HurtOutcome::Damaged { energy: current };
        }

        self.destroyed = true;
        info!(object = %self.id, "object destroyed");

        self.model.remove_compound_parent(physics);
        self.model.remove_static_state(physics);

        let split = if self.split_hit_mesh_on_energy_loss {
            self.split_hit_mesh(factory, physics, damage, hit)
        } else {
            None
        };
        HurtOutcome::Destroyed { split }
    }

    fn split_hit_mesh(
        &mut self,
        factory: &mut MeshFactory,
        physics: &mut dyn RigidBodyBackend,
        damage: f32,
        hit: &HitPoint,
    ) -> Option<[MeshId; 2]> {
        let splittable = self
            .model
            .mesh(hit.mesh)
            .is_some_and(|m| !m.is_disposed() && m.is_primitive());
        if !splittable {
            debug!(object = %self.id, mesh = %hit.mesh, "hit mesh gone, object stays intact");
            return None;
        }

        self.bullet_holes.clear();
        let impulse = hit.direction * damage * SPLIT_IMPULSE_PER_DAMAGE;
        self.model
            .split_mesh(factory, physics, hit.mesh, hit.point, impulse)
    }

    /// Every intersection of `shot` with this object's meshes
    pub fn determine_hit_points(&self, shot: &Shot) -> Vec<HitPoint> {
        self.model
            .raycast(&shot.ray(), shot.range)
            .into_iter()
            .map(|hit| HitPoint {
                point: hit.point,
                mesh: hit.mesh,
                normal: hit.normal,
                mirrored_direction: hit.normal,
                distance: hit.distance,
                direction: shot.direction,
                object: self.id,
            })
            .collect()
    }

    /// Stick an impact decal onto the hit mesh; returns its z-index
    pub fn add_bullet_hole(&mut self, factory: &mut MeshFactory, hit: &HitPoint) -> u32 {
        let z_index = self.next_bullet_hole_z_index;
        self.next_bullet_hole_z_index += 1;
        self.bullet_holes.push(BulletHole {
            id: factory.next_mesh_id(),
            target: hit.mesh,
            point: hit.point,
            normal: hit.normal,
            z_index,
        });
        z_index
    }

    /// Events fired by interacting with this object
    pub fn interact(&mut self) -> Vec<event::Event> {
        match &mut self.kind {
            ObjectKind::Wall(interaction) => interaction.interact(),
            ObjectKind::Door(door) => door.interaction_mut().interact(),
            ObjectKind::Movable => Vec::new(),
        }
    }

    /// Per-frame update; returns true if anything moved
    pub fn tick(&mut self, physics: &mut dyn RigidBodyBackend, dt: f32) -> bool {
        match &mut self.kind {
            ObjectKind::Door(door) if !self.destroyed => door.tick(&mut self.model, physics, dt),
            _ => false,
        }
    }

    /// Rotate the whole object rigidly around a pivot on the XZ plane
    pub fn rotate_around_pivot_xz(&mut self, pivot: Vec2, angle_deg: f32) {
        self.model.rotate_around_pivot_xz(pivot, angle_deg);
        if let ObjectKind::Door(door) = &mut self.kind {
            door.rotate_around_pivot_xz(pivot, angle_deg);
        }
    }

    pub fn dispose(&mut self, physics: &mut dyn RigidBodyBackend) {
        self.model.dispose(physics);
        self.bullet_holes.clear();
    }
}
