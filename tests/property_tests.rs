//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Segmentation: blanks + cutouts tile the run exactly
//! - Segmentation: out-of-range cutouts emit nothing
//! - Segmentation: no degenerate blank segments
//! - Destruction: energy is non-increasing and hits zero once
//! - Compound: compound/decompound restores every impostor

use bevy::math::Vec3;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use zero_core::aec::{segment_wall_run, DoorData, SegmentKind, WindowData};
use zero_core::config::AecSettings;
use zero_core::mesh::{MeshFactory, MeshOptions};
use zero_core::model::Model;
use zero_core::object::{GameObject, HurtOutcome, Interaction, Shot};
use zero_core::physics::{BodyRegistry, PhysicBody, PhysicSet, RigidBodyBackend};

/// Non-overlapping cutouts: (gap before, width, is_door) laid out left to right
fn cutouts() -> impl Strategy<Value = Vec<(f32, f32, bool)>> {
    prop::collection::vec((0u8..6, 1u8..8, any::<bool>()), 0..6).prop_map(|raw| {
        raw.into_iter()
            .map(|(gap, width, door)| (gap as f32, width as f32, door))
            .collect()
    })
}

fn layout(cutouts: &[(f32, f32, bool)]) -> (Vec<DoorData>, Vec<WindowData>, f32) {
    let mut doors = Vec::new();
    let mut windows = Vec::new();
    let mut cursor = 0.0;
    for &(gap, width, is_door) in cutouts {
        let position = cursor + gap;
        if is_door {
            doors.push(DoorData::new(position).width(width));
        } else {
            windows.push(WindowData::new(position).width(width));
        }
        cursor = position + width;
    }
    (doors, windows, cursor)
}

// ============================================================
// Segmentation Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_segments_tile_run(cutouts in cutouts(), tail in 0u8..10, start in -20i16..20, seed in any::<u64>()) {
        let (doors, windows, used) = layout(&cutouts);
        let length = used + tail as f32;
        prop_assume!(length > 0.0);
        let start = start as f32;

        let settings = AecSettings::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let segments = segment_wall_run(start, length, 10.0, &doors, &windows, &settings, &mut rng);

        // one column per blank or cutout: count each cutout once via its lowest segment
        let mut columns: Vec<(f32, f32)> = segments
            .iter()
            .filter(|s| s.y == 0.0)
            .map(|s| (s.x, s.end()))
            .collect();
        columns.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total: f32 = columns.iter().map(|(from, to)| to - from).sum();
        prop_assert!((total - length).abs() < 1e-3, "widths {} != length {}", total, length);

        let mut cursor = start;
        for (from, to) in columns {
            prop_assert!((from - cursor).abs() < 1e-3, "gap or overlap at {}", from);
            cursor = to;
        }
        prop_assert!((cursor - (start + length)).abs() < 1e-3);
    }

    #[test]
    fn prop_blanks_are_never_degenerate(cutouts in cutouts(), seed in any::<u64>()) {
        let (doors, windows, used) = layout(&cutouts);
        let settings = AecSettings::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let segments = segment_wall_run(0.0, used + 1.0, 10.0, &doors, &windows, &settings, &mut rng);
        for segment in segments.iter().filter(|s| s.kind.is_blank()) {
            prop_assert!(segment.width > 0.0);
            prop_assert_eq!(segment.height, 10.0);
        }
    }

    #[test]
    fn prop_out_of_range_cutouts_are_skipped(length in 1u8..50, beyond in 0u8..20, seed in any::<u64>()) {
        let length = length as f32;
        let position = length + beyond as f32;
        let settings = AecSettings::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let segments = segment_wall_run(
            0.0,
            length,
            10.0,
            &[DoorData::new(position)],
            &[WindowData::new(position)],
            &settings,
            &mut rng,
        );
        prop_assert_eq!(segments.len(), 1);
        prop_assert_eq!(segments[0].kind, SegmentKind::Blank);
        prop_assert_eq!(segments[0].width, length);
    }
}

// ============================================================
// Destruction Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_energy_is_monotonic(energy in 0.5f32..20.0, hits in prop::collection::vec(0.1f32..5.0, 1..20)) {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mesh = factory.create_box(
            &mut physics,
            Vec3::ZERO,
            Vec3::new(4.0, 4.0, 0.2),
            &MeshOptions::new().body(PhysicBody::fixed(PhysicSet::Glass)),
        );
        let id = factory.next_object_id();
        let mut object = GameObject::wall(
            id,
            Model::new(vec![mesh], Some(PhysicSet::Glass)),
            energy,
            Interaction::none(),
        );
        let shot = Shot::new(Vec3::new(2.0, 2.0, -5.0), Vec3::Z, 50.0, 1.0);
        let hit = object.determine_hit_points(&shot)[0];

        let mut previous = object.energy();
        let mut destructions = 0;
        for damage in hits {
            let outcome = object.hurt(&mut factory, &mut physics, damage, &hit);
            if matches!(outcome, HurtOutcome::Destroyed { .. }) {
                destructions += 1;
            }
            prop_assert!(object.energy() <= previous);
            prop_assert!(object.energy() >= 0.0);
            previous = object.energy();
        }
        prop_assert!(destructions <= 1);
        prop_assert_eq!(object.is_destroyed(), object.energy() == 0.0);
        prop_assert_eq!(destructions == 1, object.is_destroyed());
    }

    #[test]
    fn prop_compound_roundtrip_restores_impostors(sets in prop::collection::vec(prop::option::of(0usize..4), 1..8)) {
        let profiles = [PhysicSet::Concrete, PhysicSet::SolidWood, PhysicSet::Crate, PhysicSet::Furniture];
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let meshes: Vec<_> = sets
            .iter()
            .enumerate()
            .map(|(i, set)| {
                let mut options = MeshOptions::new();
                if let Some(set) = set {
                    options = options.body(PhysicBody::dynamic(profiles[*set]));
                }
                factory.create_box(&mut physics, Vec3::new(i as f32, 0.0, 0.0), Vec3::ONE, &options)
            })
            .collect();
        let mut model = Model::new(meshes, None);
        let before = model.extract_physics_impostors(&physics);
        let positions: Vec<Vec3> = model.meshes().iter().map(|m| m.position).collect();

        model.compound(&mut factory, &mut physics, Vec3::new(3.0, 1.0, -2.0));
        prop_assert_eq!(model.impostors().map(|i| i.len()), Some(model.meshes().len()));
        model.remove_compound_parent(&mut physics);

        let synthetic = PhysicSet::Synthetic.impostor(zero_core::physics::ImpostorShape::Box, false);
        for ((mesh, snapshot), position) in model.meshes().iter().zip(before).zip(positions) {
            prop_assert!(mesh.parent.is_none());
            prop_assert!((mesh.position - position).length() < 1e-4);
            prop_assert_eq!(physics.params(mesh.id), Some(snapshot.unwrap_or(synthetic)));
        }
    }
}
