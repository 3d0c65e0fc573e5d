use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use zero_core::aec::{segment_wall_run, DoorData, RoomSpec, StairsSpec, WallSpec, WindowData};
use zero_core::config::{AecSettings, GameConfig};
use zero_core::mesh::Texture;
use zero_core::object::Shot;
use zero_core::stage::Stage;

fn busy_wall() -> WallSpec {
    WallSpec::new(Texture::new("plaster"))
        .door(DoorData::new(2.0).width(3.0).linked_to(1))
        .door(DoorData::new(5.0).width(3.0).linked_to(0))
        .window(WindowData::new(10.0))
        .window(WindowData::new(18.0).full_height())
        .window(WindowData::new(26.0).non_breakable())
}

fn bench_segmentation(c: &mut Criterion) {
    let settings = AecSettings::default();
    let doors: Vec<_> = (0..8).map(|i| DoorData::new(i as f32 * 20.0)).collect();
    let windows: Vec<_> = (0..8)
        .map(|i| WindowData::new(i as f32 * 20.0 + 10.0))
        .collect();

    c.bench_function("segment_wall_run_16_cutouts", |b| {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        b.iter(|| {
            segment_wall_run(
                black_box(0.0),
                black_box(160.0),
                black_box(10.0),
                &doors,
                &windows,
                &settings,
                &mut rng,
            )
        })
    });
}

fn bench_room(c: &mut Criterion) {
    let mut spec = RoomSpec::closed(
        Vec3::ZERO,
        Vec3::new(40.0, 10.0, 30.0),
        Texture::new("plaster"),
    )
    .rot_y(30.0);
    spec.walls = std::array::from_fn(|_| busy_wall().diamond_corner(2.0));

    c.bench_function("assemble_room_diamond_corners", |b| {
        b.iter(|| {
            let mut stage = Stage::new(GameConfig::default());
            black_box(stage.add_room(black_box(&spec)))
        })
    });

    let stairs = StairsSpec {
        position: Vec3::ZERO,
        size: Vec3::new(30.0, 20.0, 12.0),
        rot_y: 90.0,
        texture: Some(Texture::new("concrete")),
        stairstep_front: 6.0,
        stairstep_rear: 6.0,
        walls: std::array::from_fn(|_| WallSpec::new(Texture::new("concrete"))),
        floor: Some(Texture::new("concrete")),
        ceiling: Some(Texture::new("concrete")),
    };

    c.bench_function("assemble_staircase", |b| {
        b.iter(|| {
            let mut stage = Stage::new(GameConfig::default());
            black_box(stage.add_stairs(black_box(&stairs)))
        })
    });
}

fn bench_shooting(c: &mut Criterion) {
    let mut stage = Stage::new(GameConfig::default());
    let mut spec = RoomSpec::closed(
        Vec3::ZERO,
        Vec3::new(40.0, 10.0, 30.0),
        Texture::new("plaster"),
    );
    spec.walls = std::array::from_fn(|_| busy_wall());
    stage.add_room(&spec);
    let shot = Shot::new(Vec3::new(20.0, 5.0, 15.0), Vec3::new(-1.0, 0.0, -1.0), 100.0, 0.0);

    c.bench_function("stage_hit_points", |b| {
        b.iter(|| black_box(stage.hit_points(black_box(&shot))))
    });
}

criterion_group!(benches, bench_segmentation, bench_room, bench_shooting);
criterion_main!(benches);
