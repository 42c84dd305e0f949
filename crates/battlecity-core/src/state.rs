//! Game state snapshot: the finalized view handed to renderers after a tick.

use serde::{Deserialize, Serialize};

use crate::components::{Bullet, Eagle, Explosion, Player, Tank};
use crate::types::SimTime;

/// Complete visible state after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    /// Store version the snapshot was taken from.
    pub version: u64,
    pub tanks: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    pub terrain: TerrainView,
    pub eagle: Eagle,
    pub explosions: Vec<Explosion>,
    pub players: Vec<Player>,
}

/// Present cell indices per material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainView {
    pub bricks: Vec<usize>,
    pub steels: Vec<usize>,
    pub rivers: Vec<usize>,
    pub snows: Vec<usize>,
    pub forests: Vec<usize>,
}
