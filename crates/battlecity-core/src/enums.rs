//! Enumeration types used throughout the simulation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Faction tag governing friendly-fire and damage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

/// Facing or travel direction. Screen coordinates: y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector along this direction's axis.
    pub fn unit(self) -> DVec2 {
        match self {
            Direction::Up => DVec2::new(0.0, -1.0),
            Direction::Down => DVec2::new(0.0, 1.0),
            Direction::Left => DVec2::new(-1.0, 0.0),
            Direction::Right => DVec2::new(1.0, 0.0),
        }
    }

    /// True when travel changes y only.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Terrain material. Each material has its own presence grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    Brick,
    Steel,
    River,
    Snow,
    Forest,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Brick,
        Material::Steel,
        Material::River,
        Material::Snow,
        Material::Forest,
    ];

    /// Edge length of one cell of this material.
    pub fn cell_size(self) -> f64 {
        match self {
            Material::Brick | Material::Steel => BLOCK_SIZE / 2.0,
            Material::River | Material::Snow | Material::Forest => BLOCK_SIZE,
        }
    }

    /// Cells per grid row (the grid is square).
    pub fn cells_per_row(self) -> usize {
        (FIELD_SIZE / self.cell_size()) as usize
    }

    /// Total cells in this material's grid.
    pub fn cell_count(self) -> usize {
        self.cells_per_row() * self.cells_per_row()
    }

    /// Whether a tank can drive through this material.
    pub fn blocks_tanks(self) -> bool {
        matches!(self, Material::Brick | Material::Steel | Material::River)
    }
}

/// Which kind of entity an explosion was spawned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Bullet,
    Tank,
}

impl ExplosionKind {
    /// Edge length of the explosion footprint.
    pub fn size(self) -> f64 {
        match self {
            ExplosionKind::Bullet => BULLET_EXPLOSION_SIZE,
            ExplosionKind::Tank => TANK_EXPLOSION_SIZE,
        }
    }

    /// Display duration before the explosion is removed.
    pub fn duration_ms(self) -> f64 {
        match self {
            ExplosionKind::Bullet => BULLET_EXPLOSION_DURATION_MS,
            ExplosionKind::Tank => TANK_EXPLOSION_DURATION_MS,
        }
    }
}
