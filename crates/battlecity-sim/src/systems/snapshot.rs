//! Snapshot system: builds the renderer-facing `GameStateSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use battlecity_core::enums::Material;
use battlecity_core::state::{GameStateSnapshot, TerrainView};

use crate::world::World;

pub fn build_snapshot(world: &World, version: u64) -> GameStateSnapshot {
    GameStateSnapshot {
        time: world.time,
        version,
        tanks: world.tanks.values().cloned().collect(),
        bullets: world.bullets.values().cloned().collect(),
        terrain: build_terrain(world),
        eagle: world.eagle.clone(),
        explosions: world.explosions.values().cloned().collect(),
        players: world.players.values().cloned().collect(),
    }
}

fn build_terrain(world: &World) -> TerrainView {
    let cells = |material: Material| -> Vec<usize> {
        world.terrain.grid(material).present_indices().collect()
    };
    TerrainView {
        bricks: cells(Material::Brick),
        steels: cells(Material::Steel),
        rivers: cells(Material::River),
        snows: cells(Material::Snow),
        forests: cells(Material::Forest),
    }
}
