//! Centralized defaults for the AEC core.
//!
//! Dimensions are in world units. Everything here is a default only: the
//! values that drive room assembly are read from [`crate::config::AecSettings`]
//! so stages can be authored against different wall heights.

// =====================================================
// Walls
// =====================================================

/// Default height of a wall run (one storey)
pub const WALL_HEIGHT: f32 = 10.0;

/// Thickness of every wall segment
pub const WALL_DEPTH: f32 = 0.5;

// =====================================================
// Doors
// =====================================================

/// Default door cutout width
pub const DOOR_WIDTH: f32 = 6.0;

/// Height of the door leaf; the frame above fills the rest of the wall
pub const DOOR_HEIGHT: f32 = 9.0;

/// Thickness of a door leaf (thinner than the wall so it can swing)
pub const DOOR_DEPTH: f32 = 0.25;

/// Seconds a swing door needs to open or close completely
pub const DOOR_SWING_SECONDS: f32 = 1.0;

/// Swing angle of a fully opened door in degrees
pub const DOOR_SWING_ANGLE: f32 = 90.0;

// =====================================================
// Windows
// =====================================================

/// Default window cutout width
pub const WINDOW_WIDTH: f32 = 6.0;

/// Height of the glass pane of a regular window
pub const WINDOW_HEIGHT: f32 = 5.0;

/// Height of the wall piece below a regular window
pub const WINDOW_BOTTOM_FRAME_HEIGHT: f32 = 3.0;

/// Thickness of a glass pane
pub const GLASS_DEPTH: f32 = 0.1;

/// Lower bound of the random energy of a breakable glass pane
pub const GLASS_ENERGY_MIN: f32 = 1.0;

/// Upper bound of the random energy of a breakable glass pane
pub const GLASS_ENERGY_MAX: f32 = 3.0;

// =====================================================
// Staircases
// =====================================================

/// Height of the guard wall at the upper stair landing
pub const STAIRS_GUARD_HEIGHT: f32 = 2.5;

// =====================================================
// Destruction
// =====================================================

/// Energy sentinel for objects that never take damage
pub const UNBREAKABLE: f32 = -1.0;

/// Maximum darkening applied to a model at zero energy
pub const MAX_DARKEN_RATIO: f32 = 0.5;

/// Per-invocation factor for linear and angular velocity damping
pub const VELOCITY_DAMPING: f32 = 0.99;

/// Pieces thinner than this are never produced when splitting a hit mesh
pub const MIN_SPLIT_PIECE_SIZE: f32 = 0.05;

/// Impulse per point of damage applied to each half of a split mesh
pub const SPLIT_IMPULSE_PER_DAMAGE: f32 = 0.5;

/// Mass assigned to a formerly static body when no physic set was recorded
pub const DEFAULT_DYNAMIC_MASS: f32 = 1.0;

// =====================================================
// Generation
// =====================================================

/// Default seed of the deterministic stage RNG
pub const DEFAULT_STAGE_SEED: u64 = 42;
