//! Intents sent from external producers (input adapters, AI) to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;
use crate::types::TankId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// A player started holding a direction key.
    Press { player: String, direction: Direction },
    /// A player let go of a direction key.
    Release { player: String, direction: Direction },
    /// A tank wants to fire.
    Fire { tank_id: TankId },
    /// Despawn a tank (level scripts, AI director).
    RemoveTank { tank_id: TankId },
}
