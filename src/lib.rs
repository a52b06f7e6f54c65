//! Gridfall - deterministic simulation core for tile-based arena games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile grid, collision testers, kinematic resolver)
//! - `weapons`: Weapon cadence and bullet spawn requests, driven by an explicit clock
//! - `anim`: Pure easing helpers for menu/HUD animation
//!
//! The crate owns no window, renderer, audio, or input; a game-mode
//! controller drives it by spawning entities, assigning velocities, and
//! calling [`sim::advance`] once per frame with the elapsed wall time.

pub mod anim;
pub mod sim;
pub mod weapons;

pub use sim::{
    Aabb, Body, CollisionResult, ContactFlags, Facing, Kind, LevelError, Polygon, Shape, TileGrid,
    World,
};
pub use weapons::{BulletSpawn, Weapon, WeaponClass, WeaponSpec};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep; longer frames are subdivided so a lag
    /// spike can never integrate a body through thin terrain
    pub const TIME_STEP: f32 = 0.016;

    /// Downward acceleration on airborne fighters (units/s^2)
    pub const GRAVITY: f32 = 3.5;
    /// Horizontal run speed for fighters
    pub const FIGHTER_SPEED: f32 = 3.5;
    /// Vertical launch speed when jumping off the ground
    pub const JUMP_SPEED: f32 = 3.5;

    /// Default generated board dimensions
    pub const BOARD_LENGTH: usize = 50;
    pub const BOARD_HEIGHT: usize = 18;
    /// Column growth probability for terrain generation
    pub const GROWTH_P: f32 = 0.93;

    /// Push-out applied after a horizontal wall contact so the same
    /// contact does not re-trigger next tick
    pub const EDGE_NUDGE: f32 = 0.01;

    /// Starting fighter hit points
    pub const FIGHTER_HEALTH: f32 = 500.0;
    /// Fighter collision extent (width, height)
    pub const FIGHTER_EXTENT: Vec2 = Vec2::new(1.0, 1.0);
    /// Bullet collision extent
    pub const BULLET_EXTENT: Vec2 = Vec2::new(0.2, 0.2);

    /// Terrain probe points as fractions of the body extent: feet at
    /// mid-width, side probes at mid-height, right probe inset from the
    /// true edge
    pub const FOOT_PROBE_X: f32 = 0.5;
    pub const SIDE_PROBE_Y: f32 = 0.5;
    pub const RIGHT_PROBE_X: f32 = 0.85;

    /// Offset from a fighter's corner to its muzzle
    pub const MUZZLE_OFFSET: Vec2 = Vec2::new(0.1, 0.2);

    /// Bodies this far below the open bottom edge are removed
    pub const FALL_OUT_MARGIN: f32 = 2.0;
}
