use anyhow::Context;
use bevy::math::Vec3;
use bevy::prelude::{App, MinimalPlugins, Res, Startup};
use serde_json::json;
use tracing::info;

use zero_core::aec::{DoorData, RoomSpec, StairsSpec, WallSpec, WindowData};
use zero_core::config::GameConfig;
use zero_core::mesh::Texture;
use zero_core::object::{DoorAnimation, HurtOutcome, Shot};
use zero_core::stage::{StagePlugin, StageResource};

/// Headless demo: builds a room and a staircase, opens a door, shoots out a window.
///
/// Usage: `zero-demo [config.json|config.ron]`
fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => GameConfig::default(),
    };

    // StagePlugin initializes tracing from config.tracing
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(StagePlugin {
            config: config.clone(),
        })
        .add_systems(Startup, setup);
    app.update();

    let stage = app.world().resource::<StageResource>().clone();
    let door = {
        let stage = stage
            .0
            .read()
            .map_err(|_| anyhow::anyhow!("stage lock poisoned"))?;
        stage
            .objects()
            .iter()
            .find(|o| o.door_state().is_some())
            .map(|o| o.id())
    };
    if let Some(door) = door {
        let events = stage
            .0
            .write()
            .map_err(|_| anyhow::anyhow!("stage lock poisoned"))?
            .interact(door);
        info!(%door, events = events.len(), "opened door");
    }

    for _ in 0..10 {
        app.update();
    }

    let shot = Shot::new(Vec3::new(16.0, 5.0, 5.0), Vec3::NEG_Z, 100.0, 1.0);
    let mut shots = Vec::new();
    {
        let mut stage = stage
            .0
            .write()
            .map_err(|_| anyhow::anyhow!("stage lock poisoned"))?;
        while let Some(report) = stage.shoot(&shot) {
            let destroyed = matches!(report.outcome, HurtOutcome::Destroyed { .. });
            shots.push(json!({
                "object": report.hit.object.0,
                "distance": report.hit.distance,
                "outcome": format!("{:?}", report.outcome),
                "bullet_hole": report.bullet_hole,
            }));
            if destroyed || shots.len() >= 8 {
                break;
            }
        }
    }

    let stage = stage
        .0
        .read()
        .map_err(|_| anyhow::anyhow!("stage lock poisoned"))?;
    let summary = json!({
        "seed": config.seed,
        "objects": stage.objects().len(),
        "bodies": stage.physics().len(),
        "destroyed": stage.objects().iter().filter(|o| o.is_destroyed()).count(),
        "shots": shots,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn setup(stage: Res<StageResource>) {
    let Ok(mut stage) = stage.0.write() else {
        return;
    };
    let plaster = Texture::new("plaster");

    let mut room = RoomSpec::closed(Vec3::ZERO, Vec3::new(20.0, 10.0, 10.0), plaster.clone());
    room.walls[0] = WallSpec::new(plaster.clone())
        .door(
            DoorData::new(4.0)
                .width(3.0)
                .animation(DoorAnimation::SwingACounterClockwise)
                .linked_to(1),
        )
        .door(
            DoorData::new(7.0)
                .width(3.0)
                .animation(DoorAnimation::SwingBClockwise)
                .linked_to(0),
        )
        .window(WindowData::new(14.0).width(4.0))
        .diamond_corner(1.0);
    room.walls[2] = WallSpec::new(plaster.clone()).window(WindowData::new(2.0).full_height());
    stage.add_room(&room);

    let concrete = Texture::new("concrete");
    stage.add_stairs(&StairsSpec {
        position: Vec3::new(40.0, 0.0, 0.0),
        size: Vec3::new(30.0, 20.0, 12.0),
        rot_y: 90.0,
        texture: Some(concrete.clone()),
        stairstep_front: 6.0,
        stairstep_rear: 6.0,
        walls: std::array::from_fn(|_| WallSpec::new(concrete.clone())),
        floor: Some(concrete.clone()),
        ceiling: None,
    });

    info!(objects = stage.objects().len(), "demo stage ready");
}
