//! Two-flight staircase.
//!
//! Seen from above, with the front at the room position and X as the run
//! direction, the lower flight climbs on the near half of the depth from
//! floor to quarter height, a landing spans the rear, and the upper flight
//! climbs back to half height on the far half. A spine wall separates the
//! flights and a guard wall closes the drop beside the upper floor.
//!
//! ```text
//!  z ^   upper flight  <--  |landing|
//!    |  ----- spine --------|       |
//!    |   lower flight  -->  |       |
//!    +------------------------------> x
//!    front                    rear
//! ```

use bevy::math::{Vec2, Vec3};
use tracing::debug;

use super::room::RoomFactory;
use super::{AecContext, StairsSpec};
use crate::constants::UNBREAKABLE;
use crate::logging::TimingSpan;
use crate::math::{angle_between_points_xz, rad_to_deg};
use crate::mesh::{Anchor, Mesh, MeshOptions, Texture};
use crate::model::Model;
use crate::object::{GameObject, Interaction};
use crate::physics::{PhysicBody, PhysicSet};

/// Derived dimensions of a staircase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairsLayout {
    pub quarter_height: f32,
    pub half_height: f32,
    /// Horizontal run of each flight
    pub flight_run: f32,
    /// Incline length of each flight
    pub flight_length: f32,
    /// Incline angle in degrees
    pub flight_pitch: f32,
    /// Heading of the flights in degrees
    pub flight_yaw: f32,
}

impl StairsLayout {
    pub fn new(spec: &StairsSpec) -> Self {
        let quarter_height = spec.size.y / 4.0;
        let half_height = spec.size.y / 2.0;
        let flight_run = spec.size.x - spec.stairstep_front - spec.stairstep_rear;
        let rise = half_height - quarter_height;

        let start = Vec2::new(spec.position.x + spec.stairstep_front, spec.position.z);
        let end = Vec2::new(
            spec.position.x + spec.size.x - spec.stairstep_rear,
            spec.position.z,
        );

        Self {
            quarter_height,
            half_height,
            flight_run,
            flight_length: (flight_run * flight_run + rise * rise).sqrt(),
            flight_pitch: rad_to_deg(rise.atan2(flight_run)),
            flight_yaw: angle_between_points_xz(start, end),
        }
    }
}

impl RoomFactory {
    /// Assemble the room shell and the flights, landings, spine and guard,
    /// all rotated around the staircase position by `rot_y`
    pub fn build_stairs(ctx: &mut AecContext<'_>, spec: &StairsSpec) -> Vec<GameObject> {
        let _span = TimingSpan::new("stairs_assembly");
        let mut objects = Self::build_unrotated(ctx, &spec.room());

        match &spec.texture {
            Some(texture) => {
                let layout = StairsLayout::new(spec);
                objects.extend(Self::stair_parts(ctx, spec, &layout, texture));
            }
            None => debug!("staircase without texture, only the room shell is built"),
        }

        Self::rotate_group(&mut objects, spec.position, spec.rot_y);
        debug!(objects = objects.len(), rot_y = spec.rot_y, "assembled staircase");
        objects
    }

    fn stair_parts(
        ctx: &mut AecContext<'_>,
        spec: &StairsSpec,
        layout: &StairsLayout,
        texture: &Texture,
    ) -> Vec<GameObject> {
        let origin = spec.position;
        let size = spec.size;
        let (front, rear) = (spec.stairstep_front, spec.stairstep_rear);
        let half_depth = size.z / 2.0;
        let flight_mid_x = origin.x + front + layout.flight_run / 2.0;
        let wall_depth = ctx.settings.wall_depth;

        let concrete = |anchor: Anchor, rotation: Vec3| {
            MeshOptions::new()
                .texture(Some(texture.clone()))
                .body(PhysicBody::fixed(PhysicSet::Concrete))
                .anchor(anchor)
                .rotation(rotation)
        };

        let mut meshes: Vec<Mesh> = Vec::with_capacity(6);

        // lower flight, rising towards +X
        meshes.push(ctx.factory.create_plane(
            ctx.physics,
            Vec3::new(
                flight_mid_x,
                origin.y + layout.quarter_height / 2.0,
                origin.z + half_depth / 2.0,
            ),
            layout.flight_length,
            half_depth,
            &concrete(
                Anchor::CenterXyz,
                Vec3::new(0.0, layout.flight_yaw, layout.flight_pitch),
            ),
        ));

        // mid landing across the full depth
        meshes.push(ctx.factory.create_plane(
            ctx.physics,
            Vec3::new(
                origin.x + size.x - rear,
                origin.y + layout.quarter_height,
                origin.z,
            ),
            rear,
            size.z,
            &concrete(Anchor::LowestXyz, Vec3::ZERO),
        ));

        // upper flight, rising back towards the front
        meshes.push(ctx.factory.create_plane(
            ctx.physics,
            Vec3::new(
                flight_mid_x,
                origin.y + (layout.quarter_height + layout.half_height) / 2.0,
                origin.z + half_depth * 1.5,
            ),
            layout.flight_length,
            half_depth,
            &concrete(
                Anchor::CenterXyz,
                Vec3::new(0.0, layout.flight_yaw, -layout.flight_pitch),
            ),
        ));

        // upper floor in front of the upper flight
        if front > 0.0 {
            meshes.push(ctx.factory.create_plane(
                ctx.physics,
                Vec3::new(
                    origin.x,
                    origin.y + layout.half_height,
                    origin.z + half_depth,
                ),
                front,
                half_depth,
                &concrete(Anchor::LowestXyz, Vec3::ZERO),
            ));
        }

        // spine between the flights
        meshes.push(ctx.factory.create_box(
            ctx.physics,
            Vec3::new(
                origin.x + front,
                origin.y,
                origin.z + half_depth - wall_depth / 2.0,
            ),
            Vec3::new(layout.flight_run, layout.half_height, wall_depth),
            &concrete(Anchor::LowestXyz, Vec3::ZERO),
        ));

        // guard above the lower flight
        meshes.push(ctx.factory.create_box(
            ctx.physics,
            Vec3::new(
                origin.x,
                origin.y + layout.half_height,
                origin.z + half_depth - wall_depth / 2.0,
            ),
            Vec3::new(
                size.x - rear,
                ctx.settings.stairs_guard_height,
                wall_depth,
            ),
            &concrete(Anchor::LowestXyz, Vec3::ZERO),
        ));

        meshes
            .into_iter()
            .map(|mesh| {
                let model = Model::new(vec![mesh], Some(PhysicSet::Concrete));
                GameObject::wall(
                    ctx.factory.next_object_id(),
                    model,
                    UNBREAKABLE,
                    Interaction::none(),
                )
            })
            .collect()
    }
}
