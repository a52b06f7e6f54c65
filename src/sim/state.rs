//! World state and entity records
//!
//! Everything that must survive a snapshot lives here. Entity records are
//! flat structs tagged with a [`Kind`]; the collection keeps stable ids,
//! marks bodies dead during the tick, and compacts once at the tick
//! boundary so iteration never invalidates.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aabb::Aabb;
use super::grid::TileGrid;
use super::polygon::Polygon;
use crate::consts::*;

/// Per-direction terrain contact, recomputed at the end of every sub-step.
///
/// Flags describe the position a body ended the previous sub-step in, so
/// movement gating reads them one tick late. That lag is contractual;
/// downstream movement tuning depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFlags {
    pub grounded: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_above: bool,
}

/// Entity capability tag. The set is closed; behavior dispatches on the
/// tag rather than through a class hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// Gravity-bound, terrain-probed, damageable
    Fighter,
    /// Straight-line projectile with finite range
    Bullet,
    /// Free-flying convex polygon that bounces off other props
    Prop,
}

/// Horizontal facing, for sprite and muzzle direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Normalized sprite-sheet rectangle: [x, y, width, height]
pub type SpriteRect = [f32; 4];

/// Sprite lookup for the closed entity set; callers index their sheet with
/// the returned rect
pub fn sprite_rect(kind: Kind, facing: Facing) -> SpriteRect {
    match (kind, facing) {
        (Kind::Fighter, Facing::Right) => [0.0, 0.0, 0.25, 0.25],
        (Kind::Fighter, Facing::Left) => [0.25, 0.0, 0.25, 0.25],
        (Kind::Bullet, _) => [0.5, 0.0, 0.25, 0.25],
        (Kind::Prop, _) => [0.75, 0.0, 0.25, 0.25],
    }
}

/// Collision footprint: a fixed box extent, or a convex polygon carried
/// with its model-to-world scale and rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Extent(Vec2),
    Polygon {
        poly: Polygon,
        scale: Vec2,
        rotation: f32,
    },
}

/// A simulated entity. `pos` is the bottom-left corner of the extent box,
/// or the model origin for polygon props.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: Kind,
    /// Owning side; bullets never damage their own team
    pub team: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    pub contacts: ContactFlags,
    pub health: f32,
    /// Distance a bullet has covered so far (signed, along x)
    #[serde(default)]
    pub traveled: f32,
    /// Range a bullet covers before dying; unused for other kinds
    #[serde(default)]
    pub max_range: f32,
    /// Hit points removed on impact; bullets only
    #[serde(default)]
    pub damage: f32,
    /// Cleared during the tick, compacted at the tick boundary
    pub alive: bool,
}

impl Body {
    /// World-space bounding box, rebuilt from the current position
    pub fn aabb(&self) -> Aabb {
        match &self.shape {
            Shape::Extent(extent) => Aabb::from_corner(self.pos, *extent),
            Shape::Polygon {
                poly,
                scale,
                rotation,
            } => Aabb::of_points(poly.transformed(*scale, *rotation, self.pos).verts()),
        }
    }

    /// World-space polygon for props; `None` for extent shapes
    pub fn world_polygon(&self) -> Option<Polygon> {
        match &self.shape {
            Shape::Polygon {
                poly,
                scale,
                rotation,
            } => Some(poly.transformed(*scale, *rotation, self.pos)),
            Shape::Extent(_) => None,
        }
    }
}

/// Horizontal extent of the playable area; fighters are pinned inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
}

/// Snapshot round-trip failure
#[derive(Debug, Error)]
#[error("snapshot serialization failed: {0}")]
pub struct SnapshotError(#[from] serde_json::Error);

/// The simulated world: terrain plus the active-entity collection.
///
/// The grid is owned here exclusively and never mutated after
/// construction; entities query it only through the world during a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub grid: TileGrid,
    pub bounds: WorldBounds,
    /// Active bodies in spawn order (stable ids, ascending)
    pub bodies: Vec<Body>,
    /// Sub-steps executed so far
    pub time_ticks: u64,
    next_id: u32,
}

impl World {
    /// Build a world whose bounds span the grid, leaving one column of
    /// slack on the right so a full-width body stays on the board
    pub fn new(grid: TileGrid) -> Self {
        let bounds = WorldBounds {
            min_x: 0.0,
            max_x: grid.width() as f32 - 1.0,
        };
        Self::with_bounds(grid, bounds)
    }

    pub fn with_bounds(grid: TileGrid, bounds: WorldBounds) -> Self {
        Self {
            grid,
            bounds,
            bodies: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity id
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_fighter(&mut self, team: u8, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.bodies.push(Body {
            id,
            kind: Kind::Fighter,
            team,
            pos,
            vel: Vec2::ZERO,
            shape: Shape::Extent(FIGHTER_EXTENT),
            contacts: ContactFlags::default(),
            health: FIGHTER_HEALTH,
            traveled: 0.0,
            max_range: 0.0,
            damage: 0.0,
            alive: true,
        });
        id
    }

    pub fn spawn_bullet(
        &mut self,
        team: u8,
        pos: Vec2,
        vel: Vec2,
        damage: f32,
        max_range: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.bodies.push(Body {
            id,
            kind: Kind::Bullet,
            team,
            pos,
            vel,
            shape: Shape::Extent(BULLET_EXTENT),
            contacts: ContactFlags::default(),
            health: 0.0,
            traveled: 0.0,
            max_range,
            damage,
            alive: true,
        });
        id
    }

    pub fn spawn_prop(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        poly: Polygon,
        scale: Vec2,
        rotation: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.bodies.push(Body {
            id,
            kind: Kind::Prop,
            team: 0,
            pos,
            vel,
            shape: Shape::Polygon {
                poly,
                scale,
                rotation,
            },
            contacts: ContactFlags::default(),
            health: 0.0,
            traveled: 0.0,
            max_range: 0.0,
            damage: 0.0,
            alive: true,
        });
        id
    }

    /// Mark a body for removal; it disappears at the next tick boundary
    pub fn despawn(&mut self, id: u32) {
        if let Some(body) = self.body_mut(id) {
            body.alive = false;
        }
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id && b.alive)
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id && b.alive)
    }

    /// Contact flags from the previous sub-step's probe
    pub fn contact_flags(&self, id: u32) -> Option<ContactFlags> {
        self.body(id).map(|b| b.contacts)
    }

    /// Input-driven horizontal velocity assignment
    pub fn set_velocity_x(&mut self, id: u32, vx: f32) {
        if let Some(body) = self.body_mut(id) {
            body.vel.x = vx;
        }
    }

    /// Input-driven vertical velocity assignment (jumps)
    pub fn set_velocity_y(&mut self, id: u32, vy: f32) {
        if let Some(body) = self.body_mut(id) {
            body.vel.y = vy;
        }
    }

    /// Drop bodies marked dead during the tick. Runs only at the tick
    /// boundary so in-tick iteration stays index-stable.
    pub(crate) fn compact(&mut self) {
        self.bodies.retain(|b| b.alive);
    }

    /// Serialize the full world for save/continue
    pub fn to_snapshot_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a world previously captured with [`World::to_snapshot_json`]
    pub fn from_snapshot_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{EMPTY, TOPSOIL};

    fn flat_world() -> World {
        let mut cells = vec![EMPTY; 10 * 4];
        for col in 0..10 {
            cells[3 * 10 + col] = TOPSOIL;
        }
        World::new(TileGrid::from_cells(10, 4, cells))
    }

    #[test]
    fn test_spawn_assigns_ascending_ids() {
        let mut world = flat_world();
        let a = world.spawn_fighter(1, Vec2::new(1.0, -2.0));
        let b = world.spawn_fighter(2, Vec2::new(5.0, -2.0));
        assert!(b > a);
        assert_eq!(world.body(a).map(|f| f.team), Some(1));
        assert_eq!(world.body(b).map(|f| f.team), Some(2));
    }

    #[test]
    fn test_despawn_defers_to_compaction() {
        let mut world = flat_world();
        let id = world.spawn_fighter(1, Vec2::new(1.0, -2.0));
        world.despawn(id);
        // Marked dead: invisible to lookups, still present in storage
        assert!(world.body(id).is_none());
        assert_eq!(world.bodies.len(), 1);
        world.compact();
        assert!(world.bodies.is_empty());
    }

    #[test]
    fn test_body_aabb_tracks_position() {
        let mut world = flat_world();
        let id = world.spawn_fighter(1, Vec2::new(2.0, -3.0));
        let aabb = world.body(id).unwrap().aabb();
        assert_eq!(aabb.min, Vec2::new(2.0, -3.0));
        assert_eq!(aabb.max, Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut world = flat_world();
        let id = world.spawn_fighter(1, Vec2::new(4.0, -2.5));
        world.set_velocity_x(id, 3.5);

        let json = world.to_snapshot_json().unwrap();
        let restored = World::from_snapshot_json(&json).unwrap();
        assert_eq!(restored.bodies.len(), 1);
        let body = restored.body(id).unwrap();
        assert_eq!(body.pos, Vec2::new(4.0, -2.5));
        assert_eq!(body.vel.x, 3.5);
        // Fresh spawns in the restored world keep ids unique
        let mut restored = restored;
        let next = restored.spawn_fighter(2, Vec2::ZERO);
        assert!(next > id);
    }

    #[test]
    fn test_sprite_rect_is_total() {
        // Facing picks the fighter column; bullets and props ignore it
        assert_ne!(
            sprite_rect(Kind::Fighter, Facing::Left),
            sprite_rect(Kind::Fighter, Facing::Right)
        );
        assert_eq!(
            sprite_rect(Kind::Bullet, Facing::Left),
            sprite_rect(Kind::Bullet, Facing::Right)
        );
    }
}
