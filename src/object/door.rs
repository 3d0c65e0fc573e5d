//! Swing doors.
//!
//! A door leaf rotates around its hinge ("turn point") between the closed
//! pose captured at construction and a quarter turn. Paired double doors
//! reference each other by [`ObjectId`]; the stage opens both leaves.

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::wall::Interaction;
use crate::constants::DOOR_SWING_ANGLE;
use crate::math::{rotate_vec3_around_pivot_xz, yaw_quat};
use crate::mesh::{MeshId, ObjectId};
use crate::model::Model;
use crate::physics::RigidBodyBackend;

/// Swing direction. Hinge A is the edge at the start of the wall run,
/// hinge B the edge at its end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorAnimation {
    #[default]
    None,
    SwingAClockwise,
    SwingACounterClockwise,
    SwingBClockwise,
    SwingBCounterClockwise,
}

/// Which edge of the leaf the door turns around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hinge {
    A,
    B,
}

impl DoorAnimation {
    pub fn hinge(&self) -> Option<Hinge> {
        match self {
            Self::None => None,
            Self::SwingAClockwise | Self::SwingACounterClockwise => Some(Hinge::A),
            Self::SwingBClockwise | Self::SwingBCounterClockwise => Some(Hinge::B),
        }
    }

    /// Yaw of the fully opened leaf in degrees (clockwise seen from above is negative)
    pub fn open_angle(&self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::SwingAClockwise | Self::SwingBClockwise => -DOOR_SWING_ANGLE,
            Self::SwingACounterClockwise | Self::SwingBCounterClockwise => DOOR_SWING_ANGLE,
        }
    }
}

/// Swing state; the value carried while moving is the open fraction in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorState {
    Closed,
    Opening(f32),
    Open,
    Closing(f32),
}

#[derive(Debug, Clone)]
pub struct Door {
    interaction: Interaction,
    animation: DoorAnimation,
    state: DoorState,
    turn_point: Vec3,
    linked_door: Option<ObjectId>,
    swing_seconds: f32,
    closed_pose: Vec<(MeshId, Vec3, Quat)>,
}

impl Door {
    pub fn new(
        interaction: Interaction,
        animation: DoorAnimation,
        turn_point: Vec3,
        swing_seconds: f32,
    ) -> Self {
        Self {
            interaction,
            animation,
            state: DoorState::Closed,
            turn_point,
            linked_door: None,
            swing_seconds: swing_seconds.max(f32::EPSILON),
            closed_pose: Vec::new(),
        }
    }

    pub fn set_linked_door(&mut self, linked: Option<ObjectId>) {
        self.linked_door = linked;
    }

    pub fn linked_door(&self) -> Option<ObjectId> {
        self.linked_door
    }

    pub fn animation(&self) -> DoorAnimation {
        self.animation
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn turn_point(&self) -> Vec3 {
        self.turn_point
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DoorState::Open)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, DoorState::Opening(_) | DoorState::Closing(_))
    }

    /// Open fraction: 0 closed, 1 fully open
    pub fn progress(&self) -> f32 {
        match self.state {
            DoorState::Closed => 0.0,
            DoorState::Open => 1.0,
            DoorState::Opening(p) | DoorState::Closing(p) => p,
        }
    }

    /// Remember the closed transforms of the leaf meshes
    pub fn capture_closed_pose(&mut self, model: &Model) {
        self.closed_pose = model
            .meshes()
            .iter()
            .map(|m| (m.id, m.position, m.rotation))
            .collect();
    }

    /// Start opening. Returns false if the door cannot swing or is already open(ing).
    pub fn open(&mut self) -> bool {
        if self.animation == DoorAnimation::None {
            return false;
        }
        match self.state {
            DoorState::Closed => self.state = DoorState::Opening(0.0),
            DoorState::Closing(p) => self.state = DoorState::Opening(p),
            DoorState::Opening(_) | DoorState::Open => return false,
        }
        true
    }

    /// Start closing. Returns false if the door is already closed or closing.
    pub fn close(&mut self) -> bool {
        match self.state {
            DoorState::Open => self.state = DoorState::Closing(1.0),
            DoorState::Opening(p) => self.state = DoorState::Closing(p),
            DoorState::Closed | DoorState::Closing(_) => return false,
        }
        true
    }

    pub fn toggle(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Closing(_) => self.open(),
            DoorState::Open | DoorState::Opening(_) => self.close(),
        }
    }

    /// Advance the swing by `dt` seconds and move the leaf meshes.
    /// Returns true while the leaf moved this tick.
    pub fn tick(&mut self, model: &mut Model, physics: &mut dyn RigidBodyBackend, dt: f32) -> bool {
        let step = dt / self.swing_seconds;
        let progress = match self.state {
            DoorState::Opening(p) => {
                let p = (p + step).min(1.0);
                self.state = if p >= 1.0 {
                    DoorState::Open
                } else {
                    DoorState::Opening(p)
                };
                p
            }
            DoorState::Closing(p) => {
                let p = (p - step).max(0.0);
                self.state = if p <= 0.0 {
                    DoorState::Closed
                } else {
                    DoorState::Closing(p)
                };
                p
            }
            DoorState::Closed | DoorState::Open => return false,
        };
        self.place_leaf(model, physics, progress);
        true
    }

    fn place_leaf(&self, model: &mut Model, physics: &mut dyn RigidBodyBackend, progress: f32) {
        let angle = self.animation.open_angle() * progress;
        let pivot = Vec2::new(self.turn_point.x, self.turn_point.z);
        let yaw = yaw_quat(angle);
        for (id, position, rotation) in &self.closed_pose {
            if let Some(mesh) = model.mesh_mut(*id) {
                if mesh.is_disposed() || mesh.parent.is_some() {
                    continue;
                }
                mesh.position = rotate_vec3_around_pivot_xz(*position, pivot, angle);
                mesh.rotation = yaw * *rotation;
                physics.force_sync(*id);
            }
        }
    }

    /// Rotate the hinge and the closed pose along with a group rotation
    pub fn rotate_around_pivot_xz(&mut self, pivot: Vec2, angle_deg: f32) {
        self.turn_point = rotate_vec3_around_pivot_xz(self.turn_point, pivot, angle_deg);
        let yaw = yaw_quat(angle_deg);
        for (_, position, rotation) in &mut self.closed_pose {
            *position = rotate_vec3_around_pivot_xz(*position, pivot, angle_deg);
            *rotation = yaw * *rotation;
        }
    }
}
