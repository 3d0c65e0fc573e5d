//! Procedural architecture: walls with door/window cutouts, rooms and
//! staircases.
//!
//! Authoring records ([`DoorData`], [`WindowData`], [`WallSpec`],
//! [`RoomSpec`], [`StairsSpec`]) are plain serde values. The builders turn
//! them into [`GameObject`](crate::object::GameObject)s through an
//! [`AecContext`], which bundles the mesh factory, the physics backend, the
//! stage RNG and the dimensions in effect.

pub mod room;
pub mod segment;
pub mod stairs;
pub mod wall;

use bevy::math::Vec3;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::config::AecSettings;
use crate::mesh::{MeshFactory, Texture};
use crate::object::{DoorAnimation, Event};
use crate::physics::RigidBodyBackend;

pub use room::RoomFactory;
pub use segment::{segment_wall_run, SegmentKind, WallSegment};
pub use stairs::StairsLayout;
pub use wall::WallRun;

/// Door cutout in a wall run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorData {
    /// Offset of the door's start edge along the run
    pub position: f32,
    /// Defaults to the configured door width
    pub width: Option<f32>,
    pub events: Vec<Event>,
    pub animation: DoorAnimation,
    /// Opening with frame only, no collidable leaf
    pub no_body: bool,
    pub no_door_frame: bool,
    /// Leaf texture; the wall's texture when unset
    pub texture: Option<Texture>,
    /// Index of the paired leaf in the same run's door list
    pub linked_door_index: Option<usize>,
    pub reverse_texture_x: bool,
}

impl DoorData {
    pub fn new(position: f32) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn animation(mut self, animation: DoorAnimation) -> Self {
        self.animation = animation;
        self
    }

    pub fn events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    pub fn no_body(mut self) -> Self {
        self.no_body = true;
        self
    }

    pub fn no_door_frame(mut self) -> Self {
        self.no_door_frame = true;
        self
    }

    pub fn texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn linked_to(mut self, index: usize) -> Self {
        self.linked_door_index = Some(index);
        self
    }

    pub fn reverse_texture_x(mut self) -> Self {
        self.reverse_texture_x = true;
        self
    }

    pub fn resolved_width(&self, settings: &AecSettings) -> f32 {
        self.width.unwrap_or(settings.door_width)
    }
}

/// Window cutout in a wall run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowData {
    pub position: f32,
    /// Glass from floor to the top of the wall
    pub full_height: bool,
    pub non_breakable: bool,
    /// Defaults to the configured window width
    pub width: Option<f32>,
}

impl WindowData {
    pub fn new(position: f32) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn full_height(mut self) -> Self {
        self.full_height = true;
        self
    }

    pub fn non_breakable(mut self) -> Self {
        self.non_breakable = true;
        self
    }

    pub fn resolved_width(&self, settings: &AecSettings) -> f32 {
        self.width.unwrap_or(settings.window_width)
    }
}

/// One side of a room. A `None` texture leaves the side open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSpec {
    pub texture: Option<Texture>,
    pub doors: Vec<DoorData>,
    pub windows: Vec<WindowData>,
    /// Size of the 45° cut at the corner where this wall ends
    pub diamond_corner: f32,
}

impl WallSpec {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }

    pub fn open() -> Self {
        Self::default()
    }

    pub fn door(mut self, door: DoorData) -> Self {
        self.doors.push(door);
        self
    }

    pub fn window(mut self, window: WindowData) -> Self {
        self.windows.push(window);
        self
    }

    pub fn diamond_corner(mut self, size: f32) -> Self {
        self.diamond_corner = size;
        self
    }
}

/// Rectangular room: walls A, B, C, D in that order around the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Floor corner the room is built from and rotated around
    pub position: Vec3,
    /// x = width, y = height, z = depth
    pub size: Vec3,
    /// Whole-room yaw in degrees
    #[serde(default)]
    pub rot_y: f32,
    pub walls: [WallSpec; 4],
    #[serde(default)]
    pub floor: Option<Texture>,
    #[serde(default)]
    pub ceiling: Option<Texture>,
}

impl RoomSpec {
    /// Closed room with the same texture everywhere
    pub fn closed(position: Vec3, size: Vec3, texture: Texture) -> Self {
        Self {
            position,
            size,
            rot_y: 0.0,
            walls: std::array::from_fn(|_| WallSpec::new(texture.clone())),
            floor: Some(texture.clone()),
            ceiling: Some(texture),
        }
    }

    pub fn rot_y(mut self, rot_y: f32) -> Self {
        self.rot_y = rot_y;
        self
    }
}

/// Two-flight staircase inside a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairsSpec {
    pub position: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub rot_y: f32,
    /// Texture of flights, landings, spine and guard; `None` leaves only the room shell
    #[serde(default)]
    pub texture: Option<Texture>,
    /// Floor length in front of the lower flight
    pub stairstep_front: f32,
    /// Mid landing length behind the flights
    pub stairstep_rear: f32,
    pub walls: [WallSpec; 4],
    #[serde(default)]
    pub floor: Option<Texture>,
    #[serde(default)]
    pub ceiling: Option<Texture>,
}

impl StairsSpec {
    pub fn room(&self) -> RoomSpec {
        RoomSpec {
            position: self.position,
            size: self.size,
            rot_y: self.rot_y,
            walls: self.walls.clone(),
            floor: self.floor.clone(),
            ceiling: self.ceiling.clone(),
        }
    }
}

/// Everything the builders need from the stage
pub struct AecContext<'a> {
    pub factory: &'a mut MeshFactory,
    pub physics: &'a mut dyn RigidBodyBackend,
    pub rng: &'a mut Xoshiro256PlusPlus,
    pub settings: &'a AecSettings,
}
