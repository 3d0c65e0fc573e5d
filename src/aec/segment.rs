//! Partitioning a wall run around door and window cutouts.
//!
//! Each cutout occupies `[position, position + width)` along the run and
//! emits its own stack of segments (frame over leaf, frame/glass/frame).
//! The free intervals between cutouts become full-height blank segments,
//! so blanks and cutouts tile the run exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DoorData, WindowData};
use crate::config::AecSettings;
use crate::constants::UNBREAKABLE;
use crate::math::random_range;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentKind {
    Blank,
    /// Lintel above a door opening
    DoorFrame,
    /// Door body; `door` indexes the run's door list
    DoorLeaf { door: usize },
    WindowTopFrame,
    WindowGlass { energy: f32 },
    WindowBottomFrame,
}

impl SegmentKind {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Axis-aligned piece of a wall run, before rotation.
/// `x` is absolute along the run, `y` relative to the run base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub kind: SegmentKind,
    pub x: f32,
    pub width: f32,
    pub y: f32,
    pub height: f32,
}

impl WallSegment {
    pub fn end(&self) -> f32 {
        self.x + self.width
    }
}

/// Split the run `[start, start + length)` of a wall `height` high into
/// blank, door and window segments, ordered by `x` then `y`.
///
/// Cutouts positioned at or beyond `length` are skipped. Glass energy is
/// drawn from `rng` in document order of the retained windows.
pub fn segment_wall_run(
    start: f32,
    length: f32,
    height: f32,
    doors: &[DoorData],
    windows: &[WindowData],
    settings: &AecSettings,
    rng: &mut impl Rng,
) -> Vec<WallSegment> {
    let mut segments = Vec::new();
    let mut occupied: Vec<(f32, f32)> = Vec::new();

    for (index, door) in doors.iter().enumerate() {
        if door.position >= length {
            debug!(position = door.position, length, "door outside wall run skipped");
            continue;
        }
        let x = start + door.position;
        let width = door.resolved_width(settings);
        occupied.push((x, x + width));

        let door_height = settings.door_height.min(height);
        let frame_height = settings.door_frame_height(height);
        if !door.no_door_frame && frame_height > 0.0 {
            segments.push(WallSegment {
                kind: SegmentKind::DoorFrame,
                x,
                width,
                y: door_height,
                height: frame_height,
            });
        }
        if !door.no_body {
            segments.push(WallSegment {
                kind: SegmentKind::DoorLeaf { door: index },
                x,
                width,
                y: 0.0,
                height: door_height,
            });
        }
    }

    for window in windows {
        if window.position >= length {
            debug!(position = window.position, length, "window outside wall run skipped");
            continue;
        }
        let x = start + window.position;
        let width = window.resolved_width(settings);
        occupied.push((x, x + width));

        let energy = if window.non_breakable {
            UNBREAKABLE
        } else {
            random_range(rng, settings.glass_energy_min, settings.glass_energy_max)
        };

        let top_frame = settings.window_top_frame_height(height);
        let (bottom, glass, top) = if window.full_height {
            (0.0, height, 0.0)
        } else if top_frame >= 0.0 {
            (
                settings.window_bottom_frame_height,
                settings.window_height,
                top_frame,
            )
        } else {
            // too short for the full window: no top frame, glass clamped to the wall
            let bottom = settings.window_bottom_frame_height.min(height);
            (bottom, height - bottom, 0.0)
        };

        if bottom > 0.0 {
            segments.push(WallSegment {
                kind: SegmentKind::WindowBottomFrame,
                x,
                width,
                y: 0.0,
                height: bottom,
            });
        }
        if glass > 0.0 {
            segments.push(WallSegment {
                kind: SegmentKind::WindowGlass { energy },
                x,
                width,
                y: bottom,
                height: glass,
            });
        }
        if top > 0.0 {
            segments.push(WallSegment {
                kind: SegmentKind::WindowTopFrame,
                x,
                width,
                y: bottom + glass,
                height: top,
            });
        }
    }

    occupied.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut cursor = start;
    for (from, to) in occupied {
        push_blank(&mut segments, cursor, from, height);
        cursor = cursor.max(to);
    }
    push_blank(&mut segments, cursor, start + length, height);

    segments.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    segments
}

fn push_blank(segments: &mut Vec<WallSegment>, from: f32, to: f32, height: f32) {
    let width = to - from;
    if width > 0.0 {
        segments.push(WallSegment {
            kind: SegmentKind::Blank,
            x: from,
            width,
            y: 0.0,
            height,
        });
    }
}
