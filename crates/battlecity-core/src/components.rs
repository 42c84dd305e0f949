//! Entity records held by the canonical store.
//!
//! Records are plain data with no behaviour. Geometry and game rules live
//! in the simulation crate.

use serde::{Deserialize, Serialize};

use crate::constants::{EAGLE_X, EAGLE_Y};
use crate::enums::*;
use crate::types::{BulletId, ExplosionId, TankId};

/// A tank on the field, player-controlled or AI-controlled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: TankId,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub facing: Direction,
    /// Whether the tank translated on its most recent movement tick.
    pub moving: bool,
    pub hp: u32,
    /// Speed given to bullets this tank fires.
    pub bullet_speed: f64,
    /// Power given to bullets this tank fires.
    pub bullet_power: u32,
}

/// A live projectile. Its direction is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: BulletId,
    pub owner: TankId,
    pub direction: Direction,
    pub speed: f64,
    pub power: u32,
    pub x: f64,
    pub y: f64,
}

/// The protected base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eagle {
    pub x: f64,
    pub y: f64,
    /// Monotone: once true it never returns to false.
    pub broken: bool,
}

impl Default for Eagle {
    fn default() -> Self {
        Self {
            x: EAGLE_X,
            y: EAGLE_Y,
            broken: false,
        }
    }
}

/// A transient explosion sprite, removed by its own delayed removal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: ExplosionId,
    pub kind: ExplosionKind,
    pub x: f64,
    pub y: f64,
}

/// A human player and the tank they currently control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Tank controlled while active.
    pub tank_id: Option<TankId>,
    pub active: bool,
    pub lives: u32,
}
