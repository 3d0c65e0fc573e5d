//! Wall run builder.
//!
//! A run is laid out unrotated along +X from its origin, with its depth
//! along +Z, then the produced objects are rotated as one group around the
//! origin by `rot_y`.

use bevy::math::{Vec2, Vec3};

use super::segment::{segment_wall_run, SegmentKind, WallSegment};
use super::{AecContext, DoorData, WindowData};
use crate::constants::UNBREAKABLE;
use crate::mesh::{MeshOptions, ObjectId, Texture};
use crate::model::Model;
use crate::object::{Door, DoorAnimation, GameObject, Interaction, InteractionType};
use crate::physics::{PhysicBody, PhysicSet};

#[derive(Debug, Clone, Default)]
pub struct WallRun {
    pub origin: Vec3,
    pub length: f32,
    pub height: f32,
    /// Yaw in degrees around `origin`
    pub rot_y: f32,
    pub texture: Option<Texture>,
    pub doors: Vec<DoorData>,
    pub windows: Vec<WindowData>,
}

impl WallRun {
    pub fn new(origin: Vec3, length: f32, height: f32, rot_y: f32) -> Self {
        Self {
            origin,
            length,
            height,
            rot_y,
            ..Self::default()
        }
    }

    pub fn texture(mut self, texture: Option<Texture>) -> Self {
        self.texture = texture;
        self
    }

    pub fn doors(mut self, doors: Vec<DoorData>) -> Self {
        self.doors = doors;
        self
    }

    pub fn windows(mut self, windows: Vec<WindowData>) -> Self {
        self.windows = windows;
        self
    }

    /// Build all wall, glass and door objects of the run
    pub fn build(&self, ctx: &mut AecContext<'_>) -> Vec<GameObject> {
        let mut objects = self.build_unrotated(ctx);
        let pivot = Vec2::new(self.origin.x, self.origin.z);
        for object in &mut objects {
            object.rotate_around_pivot_xz(pivot, self.rot_y);
        }
        objects
    }

    /// Objects in run space translated to `origin`, before the yaw is applied
    pub(crate) fn build_unrotated(&self, ctx: &mut AecContext<'_>) -> Vec<GameObject> {
        let segments = segment_wall_run(
            0.0,
            self.length,
            self.height,
            &self.doors,
            &self.windows,
            ctx.settings,
            &mut *ctx.rng,
        );

        let mut objects = Vec::with_capacity(segments.len());
        let mut leaves: Vec<Option<ObjectId>> = vec![None; self.doors.len()];

        for segment in &segments {
            let object = match segment.kind {
                SegmentKind::Blank
                | SegmentKind::DoorFrame
                | SegmentKind::WindowTopFrame
                | SegmentKind::WindowBottomFrame => self.solid(ctx, segment),
                SegmentKind::WindowGlass { energy } => self.glass(ctx, segment, energy),
                SegmentKind::DoorLeaf { door } => {
                    let object = self.leaf(ctx, segment, &self.doors[door]);
                    leaves[door] = Some(object.id());
                    object
                }
            };
            objects.push(object);
        }

        link_doors(&mut objects, &self.doors, &leaves);
        objects
    }

    /// Minimum corner in world space of a slab `depth` thick centered in the wall
    fn corner(&self, segment: &WallSegment, wall_depth: f32, depth: f32) -> Vec3 {
        self.origin + Vec3::new(segment.x, segment.y, (wall_depth - depth) / 2.0)
    }

    fn solid(&self, ctx: &mut AecContext<'_>, segment: &WallSegment) -> GameObject {
        let depth = ctx.settings.wall_depth;
        let mesh = ctx.factory.create_box(
            ctx.physics,
            self.corner(segment, depth, depth),
            Vec3::new(segment.width, segment.height, depth),
            &MeshOptions::new()
                .texture(self.texture.clone())
                .body(PhysicBody::fixed(PhysicSet::Concrete)),
        );
        let model = Model::new(vec![mesh], Some(PhysicSet::Concrete));
        GameObject::wall(
            ctx.factory.next_object_id(),
            model,
            UNBREAKABLE,
            Interaction::none(),
        )
    }

    fn glass(&self, ctx: &mut AecContext<'_>, segment: &WallSegment, energy: f32) -> GameObject {
        let depth = ctx.settings.glass_depth;
        let mesh = ctx.factory.create_box(
            ctx.physics,
            self.corner(segment, ctx.settings.wall_depth, depth),
            Vec3::new(segment.width, segment.height, depth),
            &MeshOptions::new().body(PhysicBody::fixed(PhysicSet::Glass)),
        );
        let model = Model::new(vec![mesh], Some(PhysicSet::Glass));
        GameObject::wall(ctx.factory.next_object_id(), model, energy, Interaction::none())
            .with_darken_on_energy_loss(true)
            .with_split_on_energy_loss(true)
    }

    fn leaf(&self, ctx: &mut AecContext<'_>, segment: &WallSegment, data: &DoorData) -> GameObject {
        let wall_depth = ctx.settings.wall_depth;
        let depth = ctx.settings.door_depth;
        let texture = data.texture.clone().or_else(|| self.texture.clone());
        let mesh = ctx.factory.create_box(
            ctx.physics,
            self.corner(segment, wall_depth, depth),
            Vec3::new(segment.width, segment.height, depth),
            &MeshOptions::new()
                .texture(texture)
                .reverse_texture_x(data.reverse_texture_x)
                .body(PhysicBody::fixed(PhysicSet::SolidWood)),
        );
        let model = Model::new(vec![mesh], Some(PhysicSet::SolidWood));

        let hinge_x = match data.animation {
            DoorAnimation::SwingBClockwise | DoorAnimation::SwingBCounterClockwise => {
                segment.end()
            }
            _ => segment.x,
        };
        let turn_point = self.origin + Vec3::new(hinge_x, 0.0, wall_depth / 2.0);
        let door = Door::new(
            Interaction::new(InteractionType::Repeated, data.events.clone()),
            data.animation,
            turn_point,
            ctx.settings.door_swing_seconds,
        );
        GameObject::door(ctx.factory.next_object_id(), model, UNBREAKABLE, door)
    }
}

/// Resolve `linked_door_index` to the object id of the sibling leaf
fn link_doors(objects: &mut [GameObject], doors: &[DoorData], leaves: &[Option<ObjectId>]) {
    for (index, data) in doors.iter().enumerate() {
        let (Some(own), Some(linked)) = (
            leaves[index],
            data.linked_door_index
                .and_then(|i| leaves.get(i).copied().flatten()),
        ) else {
            continue;
        };
        if own == linked {
            continue;
        }
        if let Some(door) = objects
            .iter_mut()
            .find(|o| o.id() == own)
            .and_then(|o| o.door_mut())
        {
            door.set_linked_door(Some(linked));
        }
    }
}
