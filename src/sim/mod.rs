//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Injected, seeded RNG only
//! - Stable iteration order (by entity id)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod grid;
pub mod polygon;
pub mod sat;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use grid::{EMPTY, LevelError, SOIL, TOPSOIL, TileGrid, world_to_cell};
pub use polygon::Polygon;
pub use sat::{CollisionResult, resolve_velocities, sat_collision};
pub use state::{
    Body, ContactFlags, Facing, Kind, Shape, SnapshotError, SpriteRect, World, WorldBounds,
    sprite_rect,
};
pub use tick::{advance, step};
