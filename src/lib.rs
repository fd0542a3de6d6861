//! Dreamwalk - level state machine for a narrative dream game
//!
//! Core modules:
//! - `sim`: Authoritative game store (levels, entities, actions, generators)
//! - `tuning`: Data-driven mechanic thresholds

pub mod sim;
pub mod tuning;

pub use sim::{GameState, GameStore, Level};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Lower bound of player scale (also the reset value)
    pub const MIN_PLAYER_SCALE: f32 = 1.0;

    /// Leaf health range on the Wind level
    pub const MIN_LEAF_HEALTH: f32 = 0.0;
    pub const MAX_LEAF_HEALTH: f32 = 100.0;

    /// Every popped bubble splits into this many fragments
    pub const FRAGMENTS_PER_BUBBLE: usize = 3;

    /// Maximum offset of a fragment from its parent bubble
    pub const FRAGMENT_SCATTER: f32 = 0.6;

    /// Sequence-validated level node count
    pub const LANGUAGE_NODE_COUNT: usize = 6;

    /// Bubble count on the Name level
    pub const BUBBLE_COUNT: usize = 15;

    /// Obstacle count on the Chewing level
    pub const FLESH_BALL_COUNT: usize = 20;

    /// Tunnel segment count on the Prologue corridor
    pub const TUNNEL_SEGMENTS: usize = 12;

    /// Connection level node count range (inclusive)
    pub const MIN_CONNECTION_NODES: usize = 6;
    pub const MAX_CONNECTION_NODES: usize = 9;
}

/// Horizontal (XZ-plane) distance between two points
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Point on a spiral in the XZ plane at angle `theta` and radius `r`
#[inline]
pub fn spiral_point(r: f32, theta: f32, y: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}
