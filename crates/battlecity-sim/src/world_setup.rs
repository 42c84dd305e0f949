//! Factories for the initial world and for new tanks.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use battlecity_core::components::Tank;
use battlecity_core::constants::*;
use battlecity_core::enums::{Direction, Side};
use battlecity_core::types::{Rect, TankId};

use crate::level::Level;
use crate::queries;
use crate::world::World;

/// Everything needed to spawn a tank except its id.
#[derive(Debug, Clone, PartialEq)]
pub struct TankTemplate {
    pub side: Side,
    /// Fixed spawn position; `None` picks a free top-row slot.
    pub position: Option<(f64, f64)>,
    pub facing: Direction,
    pub hp: u32,
    pub bullet_speed: f64,
    pub bullet_power: u32,
}

impl TankTemplate {
    /// A player tank at the usual player spawn, facing up.
    pub fn player() -> Self {
        Self {
            side: Side::Player,
            position: Some((PLAYER_SPAWN_X, PLAYER_SPAWN_Y)),
            facing: Direction::Up,
            hp: DEFAULT_TANK_HP,
            bullet_speed: DEFAULT_BULLET_SPEED,
            bullet_power: DEFAULT_BULLET_POWER,
        }
    }

    /// An AI tank entering through one of the top-row slots, facing down.
    pub fn ai() -> Self {
        Self {
            side: Side::Ai,
            position: None,
            facing: Direction::Down,
            ..Self::player()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.bullet_power = power;
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }
}

/// A fresh world holding the level's terrain and eagle.
pub fn world_from_level(level: &Level) -> World {
    World {
        terrain: level.terrain.clone(),
        eagle: level.eagle.clone(),
        ..World::default()
    }
}

/// Pick a spawn slot not overlapping any live tank, uniformly at random.
pub fn pick_spawn_slot(world: &World, rng: &mut ChaCha8Rng) -> Option<(f64, f64)> {
    let free: Vec<(f64, f64)> = SPAWN_SLOTS_X
        .iter()
        .map(|&x| (x, 0.0))
        .filter(|&(x, y)| {
            let slot = Rect::square(x, y, TANK_SIZE);
            world
                .tanks
                .values()
                .all(|tank| !slot.collides(&queries::tank_box(tank), -TANK_TERRAIN_TOLERANCE))
        })
        .collect();
    free.choose(rng).copied()
}

pub fn make_tank(id: TankId, template: &TankTemplate, (x, y): (f64, f64)) -> Tank {
    Tank {
        id,
        side: template.side,
        x,
        y,
        facing: template.facing,
        moving: false,
        hp: template.hp,
        bullet_speed: template.bullet_speed,
        bullet_power: template.bullet_power,
    }
}
