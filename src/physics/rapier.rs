//! bevy_rapier3d glue: impostor records to physics components.
//!
//! Zero-mass impostors become fixed bodies, everything else is dynamic with
//! an explicit collider mass. Each body of a stage is mirrored by one entity
//! tagged with [`MirroredBody`].

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{ImpostorParams, ImpostorShape};
use crate::constants::VELOCITY_DAMPING;
use crate::mesh::MeshId;

/// Tags the rapier entity mirroring one mesh body
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MirroredBody {
    pub mesh: MeshId,
    pub params: ImpostorParams,
}

/// World pose and impostor of a mesh body, ready to be mirrored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub mesh: MeshId,
    pub params: ImpostorParams,
    /// Half extents of the collider around `translation`
    pub half_extents: Vec3,
    /// Center of the collider in world space
    pub translation: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl BodyPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation).with_rotation(self.rotation)
    }

    /// Components of a freshly spawned mirror entity
    pub fn bundle(&self) -> impl Bundle {
        (
            MirroredBody {
                mesh: self.mesh,
                params: self.params,
            },
            self.transform(),
            impostor_bundle(&self.params, self.half_extents),
            Velocity {
                linvel: self.linear_velocity,
                angvel: self.angular_velocity,
            },
        )
    }
}

/// Minimum collider thickness for flat impostors
const MIN_HALF_THICKNESS: f32 = 0.01;

/// Physics components for a mesh with the given local half extents
pub fn impostor_bundle(
    params: &ImpostorParams,
    half_extents: Vec3,
) -> (RigidBody, Collider, ColliderMassProperties, Friction, Restitution) {
    let body = if params.is_static() {
        RigidBody::Fixed
    } else {
        RigidBody::Dynamic
    };
    (
        body,
        collider_for(params.shape, half_extents),
        ColliderMassProperties::Mass(params.mass),
        Friction::coefficient(params.friction),
        Restitution::coefficient(params.restitution),
    )
}

/// Collider approximating an impostor shape
pub fn collider_for(shape: ImpostorShape, half_extents: Vec3) -> Collider {
    match shape {
        ImpostorShape::Sphere => Collider::ball(half_extents.max_element()),
        ImpostorShape::Cylinder => Collider::cylinder(half_extents.y, half_extents.x),
        ImpostorShape::Box | ImpostorShape::Plane | ImpostorShape::Mesh => Collider::cuboid(
            half_extents.x.max(MIN_HALF_THICKNESS),
            half_extents.y.max(MIN_HALF_THICKNESS),
            half_extents.z.max(MIN_HALF_THICKNESS),
        ),
    }
}

/// Settle jittering spheres: damp ball bodies once per tick
pub fn damp_sphere_velocities(mut query: Query<(&Collider, &mut Velocity)>) {
    for (collider, mut velocity) in &mut query {
        if collider.as_ball().is_none() {
            continue;
        }
        velocity.linvel *= VELOCITY_DAMPING;
        velocity.angvel *= VELOCITY_DAMPING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicSet;

    #[test]
    fn test_static_params_make_fixed_body() {
        let params = PhysicSet::Concrete.impostor(ImpostorShape::Box, true);
        let (body, _, mass, _, _) = impostor_bundle(&params, Vec3::splat(1.0));
        assert!(matches!(body, RigidBody::Fixed));
        assert!(matches!(mass, ColliderMassProperties::Mass(m) if m == 0.0));
    }

    #[test]
    fn test_dynamic_params_keep_mass() {
        let params = PhysicSet::Crate.impostor(ImpostorShape::Sphere, false);
        let (body, collider, mass, friction, _) = impostor_bundle(&params, Vec3::splat(0.5));
        assert!(matches!(body, RigidBody::Dynamic));
        assert!(collider.as_ball().is_some());
        assert!(matches!(mass, ColliderMassProperties::Mass(m) if m == PhysicSet::Crate.weight()));
        assert_eq!(friction.coefficient, PhysicSet::Crate.friction());
    }

    #[test]
    fn test_flat_shapes_get_thickness() {
        let collider = collider_for(ImpostorShape::Plane, Vec3::new(2.0, 0.0, 3.0));
        let cuboid = collider.as_cuboid().unwrap();
        assert!(cuboid.half_extents().y >= MIN_HALF_THICKNESS);
    }

    #[test]
    fn test_pose_bundle_spawns_mirror() {
        let pose = BodyPose {
            mesh: MeshId(4),
            params: PhysicSet::Glass.impostor(ImpostorShape::Box, false),
            half_extents: Vec3::new(2.0, 1.0, 0.1),
            translation: Vec3::new(3.0, 1.0, 0.0),
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::Z,
            angular_velocity: Vec3::ZERO,
        };
        let mut app = App::new();
        let entity = app.world_mut().spawn(pose.bundle()).id();

        let world = app.world();
        assert_eq!(world.get::<MirroredBody>(entity).unwrap().mesh, MeshId(4));
        assert_eq!(world.get::<Transform>(entity).unwrap().translation, pose.translation);
        assert!(matches!(world.get::<RigidBody>(entity), Some(RigidBody::Dynamic)));
        assert_eq!(world.get::<Velocity>(entity).unwrap().linvel, Vec3::Z);
        let cuboid = world.get::<Collider>(entity).unwrap().as_cuboid().unwrap();
        assert!((cuboid.half_extents() - Vec3::new(2.0, 1.0, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_damping_system_only_touches_balls() {
        let mut app = App::new();
        app.add_systems(Update, damp_sphere_velocities);

        let ball = app
            .world_mut()
            .spawn((Collider::ball(1.0), Velocity::linear(Vec3::new(10.0, 0.0, 0.0))))
            .id();
        let cube = app
            .world_mut()
            .spawn((
                Collider::cuboid(1.0, 1.0, 1.0),
                Velocity::linear(Vec3::new(10.0, 0.0, 0.0)),
            ))
            .id();

        app.update();

        let ball_velocity = app.world().get::<Velocity>(ball).unwrap();
        assert!((ball_velocity.linvel.x - 9.9).abs() < 1e-4);
        let cube_velocity = app.world().get::<Velocity>(cube).unwrap();
        assert_eq!(cube_velocity.linvel.x, 10.0);
    }
}
