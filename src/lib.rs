//! babylon-zero core library
//!
//! Procedural construction and destruction for a first-person stage:
//! - Wall segmentation around door and window cutouts
//! - Room assembly (pinwheel walls, diamond corners, floor/ceiling)
//! - Two-flight staircases
//! - Compound models that break apart under fire
//! - Destructible game objects, swing doors and interaction events
//! - Stage container + Bevy plugin

pub mod aec;
pub mod config;
pub mod constants;
pub mod logging;
pub mod math;
pub mod mesh;
pub mod model;
pub mod object;
pub mod physics;
pub mod stage;
