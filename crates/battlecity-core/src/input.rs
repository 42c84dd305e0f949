//! Abstract input adapter.
//!
//! Platform key handling lives outside the simulation; adapters reduce it to
//! pure direction edges that the movement controller consumes.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;

/// A single press or release of a direction key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionEdge {
    pub direction: Direction,
    pub pressed: bool,
}

impl DirectionEdge {
    pub fn press(direction: Direction) -> Self {
        Self {
            direction,
            pressed: true,
        }
    }

    pub fn release(direction: Direction) -> Self {
        Self {
            direction,
            pressed: false,
        }
    }
}

/// Source of input for one player, polled once per tick.
pub trait InputAdapter {
    /// Edges observed since the previous poll, oldest first.
    fn poll_edges(&mut self) -> Vec<DirectionEdge>;

    /// Whether fire was requested since the previous poll.
    fn poll_fire(&mut self) -> bool {
        false
    }
}
