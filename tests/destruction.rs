//! Damage, compound release and splitting through the public API

use bevy::math::Vec3;

use zero_core::constants::UNBREAKABLE;
use zero_core::mesh::{MeshFactory, MeshOptions};
use zero_core::model::Model;
use zero_core::object::{GameObject, HurtOutcome, IgnoreReason, Interaction, Shot};
use zero_core::physics::{BodyRegistry, ImpostorShape, PhysicBody, PhysicSet, RigidBodyBackend};

fn crate_box(factory: &mut MeshFactory, physics: &mut BodyRegistry, x: f32, body: bool) -> zero_core::mesh::Mesh {
    let mut options = MeshOptions::new();
    if body {
        options = options.body(PhysicBody::dynamic(PhysicSet::Crate));
    }
    factory.create_box(physics, Vec3::new(x, 0.0, 0.0), Vec3::ONE, &options)
}

#[test]
fn three_mesh_compound_restores_snapshot_or_synthetic() {
    let mut factory = MeshFactory::default();
    let mut physics = BodyRegistry::new();
    let meshes = vec![
        crate_box(&mut factory, &mut physics, 0.0, true),
        crate_box(&mut factory, &mut physics, 1.0, false),
        crate_box(&mut factory, &mut physics, 2.0, true),
    ];
    let ids: Vec<_> = meshes.iter().map(|m| m.id).collect();
    let mut model = Model::new(meshes, Some(PhysicSet::Crate));

    model.compound(&mut factory, &mut physics, Vec3::new(1.0, 0.0, 0.0));
    // only the parent carries a body while compounded
    assert_eq!(physics.len(), 1);
    assert!(ids.iter().all(|id| physics.params(*id).is_none()));

    model.remove_compound_parent(&mut physics);
    let crate_params = PhysicSet::Crate.impostor(ImpostorShape::Box, false);
    let synthetic = PhysicSet::Synthetic.impostor(ImpostorShape::Box, false);
    assert_eq!(physics.params(ids[0]), Some(crate_params));
    assert_eq!(physics.params(ids[1]), Some(synthetic));
    assert_eq!(physics.params(ids[2]), Some(crate_params));
    assert_eq!(physics.len(), 3);
    assert!(model.meshes().iter().all(|m| m.parent.is_none()));
    assert!(!model.is_compounded());
}

#[test]
fn breakable_wall_is_destroyed_exactly_once() {
    let mut factory = MeshFactory::default();
    let mut physics = BodyRegistry::new();
    let mesh = factory.create_box(
        &mut physics,
        Vec3::ZERO,
        Vec3::new(10.0, 5.0, 0.5),
        &MeshOptions::new().body(PhysicBody::fixed(PhysicSet::Concrete)),
    );
    let id = factory.next_object_id();
    let mut wall = GameObject::wall(
        id,
        Model::new(vec![mesh], Some(PhysicSet::Concrete)),
        3.0,
        Interaction::none(),
    )
    .with_darken_on_energy_loss(true)
    .with_split_on_energy_loss(true);

    let shot = Shot::new(Vec3::new(3.0, 2.0, -10.0), Vec3::Z, 100.0, 1.5);
    let hits = wall.determine_hit_points(&shot);
    assert_eq!(hits.len(), 1);
    let hit = hits[0];

    assert_eq!(
        wall.hurt(&mut factory, &mut physics, shot.damage, &hit),
        HurtOutcome::Damaged { energy: 1.5 }
    );
    assert!((wall.model().meshes()[0].darken - 0.25).abs() < 1e-6);

    let outcome = wall.hurt(&mut factory, &mut physics, shot.damage, &hit);
    let HurtOutcome::Destroyed { split: Some(halves) } = outcome else {
        panic!("expected a split, got {outcome:?}");
    };
    assert_eq!(wall.energy(), 0.0);
    assert!(wall.is_destroyed());

    // the halves are dynamic and pushed along the shot
    for half in halves {
        let params = physics.params(half).unwrap();
        assert!(!params.is_static());
        assert!(physics.linear_velocity(half).z > 0.0);
    }

    assert_eq!(
        wall.hurt(&mut factory, &mut physics, shot.damage, &hit),
        HurtOutcome::Ignored(IgnoreReason::AlreadyDestroyed)
    );
    assert_eq!(wall.energy(), 0.0);
}

#[test]
fn unbreakable_wall_never_changes() {
    let mut factory = MeshFactory::default();
    let mut physics = BodyRegistry::new();
    let mesh = crate_box(&mut factory, &mut physics, 0.0, true);
    let id = factory.next_object_id();
    let mut wall = GameObject::wall(id, Model::new(vec![mesh], None), UNBREAKABLE, Interaction::none())
        .with_darken_on_energy_loss(true);

    let shot = Shot::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z, 100.0, 1000.0);
    let hit = wall.determine_hit_points(&shot)[0];
    for _ in 0..10 {
        assert_eq!(
            wall.hurt(&mut factory, &mut physics, shot.damage, &hit),
            HurtOutcome::Ignored(IgnoreReason::Unbreakable)
        );
    }
    assert!(!wall.is_destroyed());
    assert_eq!(wall.energy(), UNBREAKABLE);
    assert_eq!(wall.model().meshes()[0].darken, 0.0);
}

#[test]
fn overlapping_panes_yield_one_hit_each() {
    let mut factory = MeshFactory::default();
    let mut physics = BodyRegistry::new();
    let panes = vec![
        factory.create_box(&mut physics, Vec3::ZERO, Vec3::new(2.0, 2.0, 0.1), &MeshOptions::new()),
        factory.create_box(&mut physics, Vec3::new(0.0, 0.0, 0.05), Vec3::new(2.0, 2.0, 0.1), &MeshOptions::new()),
    ];
    let id = factory.next_object_id();
    let object = GameObject::movable(id, Model::new(panes, None), 1.0);
    let shot = Shot::new(Vec3::new(1.0, 1.0, -3.0), Vec3::Z, 10.0, 1.0);
    let hits = object.determine_hit_points(&shot);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.object == id && h.mirrored_direction == h.normal));

    let short = Shot::new(Vec3::new(1.0, 1.0, -3.0), Vec3::Z, 1.0, 1.0);
    assert!(object.determine_hit_points(&short).is_empty());
}
