//! Events flowing through the simulation dispatcher.
//!
//! Every state change in the canonical store is the result of exactly one
//! committed `GameEvent`. Processes observe committed events and emit new ones.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::components::{Bullet, Explosion, Tank};
use crate::enums::Direction;
use crate::types::{BulletId, ExplosionId, TankId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    // --- Tick source ---
    /// First-phase signal: advance the world by `delta` milliseconds.
    Tick { delta: f64 },
    /// Second-phase signal, fired only after every Tick consequence committed.
    AfterTick,

    // --- Input ---
    /// A direction key was pressed or released by a player.
    DirectionEdge {
        player: String,
        direction: Direction,
        pressed: bool,
    },

    // --- Movement ---
    Turn { tank_id: TankId, direction: Direction },
    Move { tank_id: TankId, x: f64, y: f64 },
    StartMove { tank_id: TankId },
    StopMove { tank_id: TankId },

    // --- Firing ---
    /// Fire intent from a player or an AI producer.
    Fire { tank_id: TankId },
    AddBullet { bullet: Bullet },
    SetCooldown { tank_id: TankId, ready_at_ms: f64 },

    // --- Advancement ---
    /// Whole-batch replacement of advanced bullets.
    UpdateBullets { bullets: BTreeMap<BulletId, Bullet> },

    // --- Destruction ---
    DestroyBullets {
        bullets: Vec<Bullet>,
        spawn_explosion: bool,
    },
    DestroyBricks { cells: BTreeSet<usize> },
    DestroySteels { cells: BTreeSet<usize> },
    /// Idempotent: the eagle stays broken.
    DestroyEagle,
    HurtTank { tank_id: TankId },

    // --- Explosions ---
    SpawnExplosion { explosion: Explosion },
    RemoveExplosion { explosion_id: ExplosionId },

    // --- Lifecycle ---
    SpawnTank { tank: Tank },
    RemoveTank { tank_id: TankId },
    CreatePlayer { name: String, lives: u32 },
    ActivatePlayer { name: String, tank_id: TankId },
    DeactivatePlayer { name: String },
    /// End of stage: every player loses control of its tank.
    DeactivateAllPlayers,
    DecrementLife { name: String },
    AddOneLife { name: String },
    RemovePlayer { name: String },
}
