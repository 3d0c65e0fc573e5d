//! Stage: the container that owns every placed object of a level together
//! with the mesh factory, physics backend and RNG they were built with.
//!
//! The Bevy side wraps a stage in [`StageResource`], advances it from
//! [`StagePlugin`]'s tick system and mirrors its bodies as rapier entities.

use bevy::prelude::{
    App, Commands, Entity, IntoSystemConfigs, Plugin, Query, Res, Resource, Time, Transform,
    Update,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::aec::{AecContext, RoomFactory, RoomSpec, StairsSpec};
use crate::config::GameConfig;
use crate::logging::LoggingPlugin;
use crate::mesh::{MeshFactory, MeshId, ObjectId};
use crate::object::{DoorState, Event, GameObject, HitPoint, HurtOutcome, Shot};
use crate::physics::rapier::{damp_sphere_velocities, BodyPose, MirroredBody};
use crate::physics::{BodyRegistry, RigidBodyBackend};

/// What a shot did to the nearest object it hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    pub hit: HitPoint,
    pub outcome: HurtOutcome,
    /// Z-index of the decal left behind, if the hit mesh survived
    pub bullet_hole: Option<u32>,
}

pub struct Stage {
    config: GameConfig,
    factory: MeshFactory,
    physics: BodyRegistry,
    rng: Xoshiro256PlusPlus,
    objects: Vec<GameObject>,
}

impl Stage {
    pub fn new(config: GameConfig) -> Self {
        Self {
            factory: MeshFactory::new(config.debug),
            physics: BodyRegistry::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            objects: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn physics(&self) -> &BodyRegistry {
        &self.physics
    }

    /// Factory and backend for building custom props before [`Stage::add_object`]
    pub fn builders(&mut self) -> (&mut MeshFactory, &mut BodyRegistry) {
        (&mut self.factory, &mut self.physics)
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn add_object(&mut self, object: GameObject) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        id
    }

    pub fn add_room(&mut self, spec: &RoomSpec) -> Vec<ObjectId> {
        let mut ctx = AecContext {
            factory: &mut self.factory,
            physics: &mut self.physics,
            rng: &mut self.rng,
            settings: &self.config.aec,
        };
        let built = RoomFactory::build(&mut ctx, spec);
        info!(objects = built.len(), "room added to stage");
        self.register(built)
    }

    pub fn add_stairs(&mut self, spec: &StairsSpec) -> Vec<ObjectId> {
        let mut ctx = AecContext {
            factory: &mut self.factory,
            physics: &mut self.physics,
            rng: &mut self.rng,
            settings: &self.config.aec,
        };
        let built = RoomFactory::build_stairs(&mut ctx, spec);
        info!(objects = built.len(), "staircase added to stage");
        self.register(built)
    }

    fn register(&mut self, objects: Vec<GameObject>) -> Vec<ObjectId> {
        let ids = objects.iter().map(GameObject::id).collect();
        self.objects.extend(objects);
        ids
    }

    /// Every hit point of `shot` across the stage, nearest first
    pub fn hit_points(&self, shot: &Shot) -> Vec<HitPoint> {
        let mut hits: Vec<HitPoint> = self
            .objects
            .iter()
            .flat_map(|o| o.determine_hit_points(shot))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Hurt the nearest object hit by `shot` and leave a bullet hole on it
    pub fn shoot(&mut self, shot: &Shot) -> Option<ShotReport> {
        let hit = *self.hit_points(shot).first()?;
        let object = self.objects.iter_mut().find(|o| o.id() == hit.object)?;

        let outcome = object.hurt(&mut self.factory, &mut self.physics, shot.damage, &hit);
        let survived = object
            .model()
            .mesh(hit.mesh)
            .is_some_and(|m| !m.is_disposed());
        let bullet_hole = survived.then(|| object.add_bullet_hole(&mut self.factory, &hit));

        debug!(object = %hit.object, mesh = %hit.mesh, distance = hit.distance, ?outcome, "shot hit");
        Some(ShotReport {
            hit,
            outcome,
            bullet_hole,
        })
    }

    /// Interact with an object. Doors toggle and take their linked door along.
    pub fn interact(&mut self, id: ObjectId) -> Vec<Event> {
        let Some(object) = self.object_mut(id) else {
            return Vec::new();
        };
        let events = object.interact();

        let Some(door) = object.door_mut() else {
            return events;
        };
        door.toggle();
        let opening = matches!(door.state(), DoorState::Opening(_) | DoorState::Open);
        let linked = door.linked_door();

        if let Some(other) = linked.and_then(|l| self.object_mut(l)).and_then(|o| o.door_mut()) {
            if opening {
                other.open();
            } else {
                other.close();
            }
        }
        events
    }

    /// Advance door animations and damp sphere bodies. Returns the number of objects that moved.
    pub fn tick(&mut self, dt: f32) -> usize {
        let mut moved = 0;
        for object in &mut self.objects {
            if object.tick(&mut self.physics, dt) {
                moved += 1;
            }
            object.model().mitigate_sphere_velocities(&mut self.physics);
        }
        moved
    }

    /// World pose of every live mesh that carries a body, compound parents included
    pub fn body_poses(&self) -> Vec<BodyPose> {
        let mut poses = Vec::with_capacity(self.physics.len());
        for object in &self.objects {
            let model = object.model();
            for mesh in model.meshes().iter().chain(model.compound_mesh()) {
                if mesh.is_disposed() {
                    continue;
                }
                let Some(params) = self.physics.params(mesh.id) else {
                    continue;
                };
                let (position, rotation) = model.world_transform(mesh);
                poses.push(BodyPose {
                    mesh: mesh.id,
                    params,
                    half_extents: mesh.shape.half_extents(),
                    translation: position + rotation * mesh.shape.local_center(),
                    rotation,
                    linear_velocity: self.physics.linear_velocity(mesh.id),
                    angular_velocity: self.physics.angular_velocity(mesh.id),
                });
            }
        }
        poses
    }

    pub fn dispose_object(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id() == id) else {
            return false;
        };
        let mut object = self.objects.remove(index);
        object.dispose(&mut self.physics);
        true
    }

    pub fn dispose(&mut self) {
        for object in &mut self.objects {
            object.dispose(&mut self.physics);
        }
        self.objects.clear();
        info!("stage disposed");
    }
}

/// Registers a [`Stage`] as a resource, ticks it every frame, mirrors its
/// bodies into rapier and damps rapier ball bodies
#[derive(Default)]
pub struct StagePlugin {
    pub config: GameConfig,
}

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<LoggingPlugin>() {
            app.add_plugins(LoggingPlugin {
                config: self.config.tracing.clone(),
            });
        }
        let stage = Stage::new(self.config.clone());
        app.insert_resource(StageResource(Arc::new(RwLock::new(stage))))
            .add_systems(
                Update,
                (stage_tick_system, sync_rapier_bodies, damp_sphere_velocities).chain(),
            );
    }
}

#[derive(Resource, Clone)]
pub struct StageResource(pub Arc<RwLock<Stage>>);

fn stage_tick_system(time: Res<Time>, stage: Res<StageResource>) {
    if let Ok(mut stage) = stage.0.write() {
        stage.tick(time.delta_secs());
    }
}

/// Spawn, update and despawn the rapier mirrors of the stage's bodies.
/// A body whose impostor changed is respawned.
fn sync_rapier_bodies(
    mut commands: Commands,
    stage: Res<StageResource>,
    mut mirrors: Query<(Entity, &MirroredBody, &mut Transform)>,
) {
    let Ok(stage) = stage.0.read() else {
        return;
    };
    let mut poses: HashMap<MeshId, BodyPose> = stage
        .body_poses()
        .into_iter()
        .map(|pose| (pose.mesh, pose))
        .collect();

    for (entity, mirror, mut transform) in &mut mirrors {
        match poses.remove(&mirror.mesh) {
            Some(pose) if pose.params == mirror.params => {
                // rapier owns the pose of dynamic bodies once spawned
                if pose.params.is_static() {
                    *transform = pose.transform();
                }
            }
            Some(pose) => {
                commands.entity(entity).despawn();
                commands.spawn(pose.bundle());
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for pose in poses.values() {
        commands.spawn(pose.bundle());
    }
}
