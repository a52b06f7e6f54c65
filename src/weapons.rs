//! Weapon cadence and bullet spawning
//!
//! All timing is explicit: the controller passes its elapsed-seconds clock
//! into [`Weapon::try_fire`], so cadence and reload behave identically
//! under test and under a real frame loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MUZZLE_OFFSET;
use crate::sim::{Facing, World};

/// Static stats for one armory slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Shots per second
    pub fire_rate: f32,
    /// Hit points removed per bullet
    pub damage: f32,
    /// Shots between reloads
    pub magazine: u32,
    /// Distance a bullet travels before dying
    pub range: f32,
    /// Bullet speed (world units per second)
    pub bullet_speed: f32,
}

const fn spec(fire_rate: f32, damage: f32, magazine: u32, range: f32, bullet_speed: f32) -> WeaponSpec {
    WeaponSpec {
        fire_rate,
        damage,
        magazine,
        range,
        bullet_speed,
    }
}

/// The armory, in slot order
pub const WEAPONS: [WeaponSpec; 15] = [
    spec(1.5, 10.0, 6, 5.0, 3.0),
    spec(2.0, 30.0, 12, 4.0, 4.0),
    spec(1.0, 45.0, 4, 2.0, 3.0),
    spec(7.0, 30.0, 14, 4.0, 5.0),
    spec(15.0, 20.0, 25, 15.0, 7.0),
    spec(40.0, 7.0, 35, 9.0, 10.0),
    spec(90.0, 18.0, 45, 20.0, 8.0),
    spec(25.0, 6.0, 25, 7.0, 10.0),
    spec(1.0, 60.0, 1, 30.0, 18.0),
    spec(1.0, 35.0, 2, 5.0, 18.0),
    spec(30.0, 7.0, 30, 3.0, 16.0),
    spec(35.0, 3.0, 35, 2.0, 8.0),
    spec(50.0, 1.0, 50, 3.0, 9.0),
    spec(1.0, 60.0, 1, 25.0, 18.0),
    spec(3.0, 35.0, 12, 10.0, 8.0),
];

/// Seconds every reload takes
pub const RELOAD_SECS: f32 = 1.5;

/// Sound-and-feel class of a slot; drives the caller's audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponClass {
    Rifle,
    Shotgun,
    Sniper,
}

impl WeaponClass {
    pub fn for_slot(slot: usize) -> Self {
        match slot {
            1 | 3 | 9 => WeaponClass::Shotgun,
            8 | 13 => WeaponClass::Sniper,
            _ => WeaponClass::Rifle,
        }
    }
}

/// Everything the controller needs to spawn a fired bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub max_range: f32,
    pub team: u8,
}

impl BulletSpawn {
    /// Hand the spawn request to the world
    pub fn spawn_into(&self, world: &mut World) -> u32 {
        world.spawn_bullet(self.team, self.pos, self.vel, self.damage, self.max_range)
    }
}

/// One carried weapon, cycling through the armory slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    slot: usize,
    magazine_left: u32,
    last_shot: Option<f32>,
    reloading: bool,
    reload_started: f32,
}

impl Weapon {
    pub fn new() -> Self {
        Self {
            slot: 0,
            magazine_left: WEAPONS[0].magazine,
            last_shot: None,
            reloading: false,
            reload_started: 0.0,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn spec(&self) -> WeaponSpec {
        WEAPONS[self.slot]
    }

    pub fn class(&self) -> WeaponClass {
        WeaponClass::for_slot(self.slot)
    }

    pub fn magazine_left(&self) -> u32 {
        self.magazine_left
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    /// Cycle the active slot forward or back, wrapping around the armory.
    /// Swapping always arrives with a full magazine and a reset cadence.
    pub fn shift(&mut self, delta: i32) {
        let n = WEAPONS.len() as i32;
        self.slot = (self.slot as i32 + delta).rem_euclid(n) as usize;
        self.magazine_left = WEAPONS[self.slot].magazine;
        self.last_shot = None;
        self.reloading = false;
    }

    /// Attempt a shot at `now` (seconds on the controller's clock).
    /// Returns the spawn request when cadence, magazine, and reload all
    /// allow one.
    pub fn try_fire(
        &mut self,
        now: f32,
        muzzle: Vec2,
        facing: Facing,
        team: u8,
    ) -> Option<BulletSpawn> {
        if self.reloading {
            if now - self.reload_started < RELOAD_SECS {
                return None;
            }
            self.reloading = false;
            self.magazine_left = self.spec().magazine;
        }

        let spec = self.spec();
        if let Some(last) = self.last_shot
            && now - last <= 1.0 / spec.fire_rate
        {
            return None;
        }

        self.last_shot = Some(now);
        self.magazine_left -= 1;
        if self.magazine_left == 0 {
            self.reloading = true;
            self.reload_started = now;
        }

        let dir = match facing {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        };
        Some(BulletSpawn {
            pos: muzzle + MUZZLE_OFFSET,
            vel: Vec2::new(dir * spec.bullet_speed, 0.0),
            damage: spec.damage,
            max_range: spec.range,
            team,
        })
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new()
    }
}
