//! Fixed-timestep kinematic resolver
//!
//! Advances every body, re-probes terrain contacts, and settles bullet and
//! prop collisions. Contact flags are recomputed from the post-move
//! position, so movement gating always reads flags one sub-step old; that
//! lag is part of the contract, not a timing bug.

use super::grid::TileGrid;
use super::sat::{resolve_velocities, sat_collision};
use super::state::{Body, ContactFlags, Kind, Shape, World, WorldBounds};
use crate::consts::*;

/// Advance the world by an arbitrary elapsed time.
///
/// The elapsed time is subdivided into [`TIME_STEP`]-sized sub-steps with
/// one final partial step for the remainder, bounding the largest single
/// integration step so a frame drop cannot tunnel a body through thin
/// terrain. Net displacement for unobstructed motion matches a single
/// integration over the full elapsed time.
pub fn advance(world: &mut World, elapsed: f32) {
    let mut remaining = elapsed;
    while remaining > TIME_STEP {
        step(world, TIME_STEP);
        remaining -= TIME_STEP;
    }
    if remaining > 0.0 {
        step(world, remaining);
    }
}

/// Run one sub-step of at most [`TIME_STEP`] seconds
pub fn step(world: &mut World, dt: f32) {
    world.time_ticks = world.time_ticks.wrapping_add(1);

    let World {
        grid,
        bounds,
        bodies,
        ..
    } = world;

    // Integrate
    for body in bodies.iter_mut().filter(|b| b.alive) {
        match body.kind {
            Kind::Fighter => integrate_fighter(body, *bounds, dt),
            Kind::Bullet => {
                body.pos += body.vel * dt;
                body.traveled += body.vel.x * dt;
            }
            Kind::Prop => {
                body.pos += body.vel * dt;
            }
        }
    }

    // Re-probe terrain for the next sub-step's gating
    for body in bodies.iter_mut().filter(|b| b.alive) {
        if body.kind == Kind::Fighter {
            probe_contacts(grid, body);
        }
    }

    // Bullets: terrain, range, then opposing fighters
    let mut hits: Vec<(usize, usize)> = Vec::new();
    for bi in 0..bodies.len() {
        let bullet = &bodies[bi];
        if bullet.kind != Kind::Bullet || !bullet.alive {
            continue;
        }
        if grid.solid_at(bullet.pos.x, bullet.pos.y) || bullet.traveled.abs() >= bullet.max_range {
            bodies[bi].alive = false;
            continue;
        }
        let bullet_box = bullet.aabb();
        let bullet_team = bullet.team;
        for fi in 0..bodies.len() {
            let fighter = &bodies[fi];
            if fighter.kind != Kind::Fighter || !fighter.alive || fighter.team == bullet_team {
                continue;
            }
            if bullet_box.overlaps(&fighter.aabb()) {
                hits.push((bi, fi));
                break;
            }
        }
    }
    for (bi, fi) in hits {
        let damage = bodies[bi].damage;
        bodies[bi].alive = false;
        let fighter = &mut bodies[fi];
        fighter.health = (fighter.health - damage).max(0.0);
        if fighter.health == 0.0 {
            fighter.alive = false;
        }
    }

    // Props bounce off each other
    for i in 0..bodies.len() {
        if bodies[i].kind != Kind::Prop || !bodies[i].alive {
            continue;
        }
        for j in (i + 1)..bodies.len() {
            if bodies[j].kind != Kind::Prop || !bodies[j].alive {
                continue;
            }
            let (Some(pa), Some(pb)) = (bodies[i].world_polygon(), bodies[j].world_polygon())
            else {
                continue;
            };
            if sat_collision(&pa, &pb).collided {
                let (mut va, mut vb) = (bodies[i].vel, bodies[j].vel);
                resolve_velocities(&mut va, &mut vb);
                bodies[i].vel = va;
                bodies[j].vel = vb;
            }
        }
    }

    // Anything fallen past the open bottom edge is gone
    let fall_limit = -(grid.height() as f32) - FALL_OUT_MARGIN;
    for body in bodies.iter_mut() {
        if body.pos.y < fall_limit {
            body.alive = false;
        }
    }

    world.compact();
}

/// Apply one sub-step of fighter kinematics, gated on last tick's flags
fn integrate_fighter(body: &mut Body, bounds: WorldBounds, dt: f32) {
    let contacts = body.contacts;

    // Vertical: move while airborne, or when launching off the ground
    if !contacts.grounded || body.vel.y > 0.0 {
        body.pos.y += body.vel.y * dt;
    }

    // Horizontal: only into an unblocked direction, pinned at the world edge
    if (body.vel.x < 0.0 && !contacts.blocked_left)
        || (body.vel.x > 0.0 && !contacts.blocked_right)
    {
        if body.pos.x < bounds.min_x && body.vel.x < 0.0 {
            body.pos.x = bounds.min_x;
        } else if body.pos.x > bounds.max_x && body.vel.x > 0.0 {
            body.pos.x = bounds.max_x;
        } else {
            body.pos.x += body.vel.x * dt;
        }
    }

    // Gravity accumulates only while airborne
    if !contacts.grounded {
        body.vel.y -= GRAVITY * dt;
    }
}

/// Recompute contact flags from the post-move position.
///
/// Probe order matches the resolver contract: feet first (with the ground
/// snap applied before the side probes read the position), then right,
/// left, and head. Each contact also settles velocity and position so the
/// same contact does not re-trigger next sub-step.
fn probe_contacts(grid: &TileGrid, body: &mut Body) {
    let extent = match &body.shape {
        Shape::Extent(extent) => *extent,
        Shape::Polygon { .. } => return,
    };
    let mut flags = ContactFlags::default();

    // Feet: land, snap onto the cell top, kill vertical motion
    let foot_x = body.pos.x + FOOT_PROBE_X * extent.x;
    if grid.solid_at(foot_x, body.pos.y) {
        flags.grounded = true;
        body.pos.y += grid.ground_adjustment(foot_x, body.pos.y);
        body.vel.y = 0.0;
    }

    // Right edge
    let side_y = body.pos.y + SIDE_PROBE_Y * extent.y;
    if grid.solid_at(body.pos.x + RIGHT_PROBE_X * extent.x, side_y) {
        flags.blocked_right = true;
        body.pos.x -= EDGE_NUDGE;
        body.vel.x = 0.0;
    }

    // Left edge
    if grid.solid_at(body.pos.x, side_y) {
        flags.blocked_left = true;
        body.pos.x += EDGE_NUDGE;
        body.vel.x = 0.0;
    }

    // Head: cancel upward motion only
    if grid.solid_at(foot_x, body.pos.y + extent.y) {
        flags.blocked_above = true;
        if body.vel.y > 0.0 {
            body.vel.y = 0.0;
        }
    }

    body.contacts = flags;
}
