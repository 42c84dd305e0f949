//! Read-only projections of the world shared by the processes.

use glam::DVec2;

use battlecity_core::components::{Bullet, Eagle, Tank};
use battlecity_core::constants::*;
use battlecity_core::enums::{Direction, Material, Side};
use battlecity_core::types::{BulletId, Rect};

use crate::world::World;

pub fn bullet_box(bullet: &Bullet) -> Rect {
    Rect::square(bullet.x, bullet.y, BULLET_SIZE)
}

pub fn tank_box(tank: &Tank) -> Rect {
    Rect::square(tank.x, tank.y, TANK_SIZE)
}

pub fn eagle_box(eagle: &Eagle) -> Rect {
    Rect::square(eagle.x, eagle.y, EAGLE_SIZE)
}

/// Bullet box widened across its travel axis to approximate blast radius.
/// Used only for terrain destruction.
pub fn spread_box(bullet: &Bullet) -> Rect {
    let raw = bullet_box(bullet);
    if bullet.direction.is_vertical() {
        raw.widen_x(BULLET_EXPLOSION_SPREAD)
    } else {
        raw.widen_y(BULLET_EXPLOSION_SPREAD)
    }
}

/// Fully inside the field, borders included.
pub fn is_inside_field(rect: &Rect) -> bool {
    (0.0..=FIELD_SIZE - rect.width).contains(&rect.x)
        && (0.0..=FIELD_SIZE - rect.height).contains(&rect.y)
}

/// No part of the box lies inside the field. Touching the border counts as outside.
pub fn is_entirely_outside_field(rect: &Rect) -> bool {
    rect.x + rect.width <= 0.0
        || rect.y + rect.height <= 0.0
        || rect.x >= FIELD_SIZE
        || rect.y >= FIELD_SIZE
}

/// Position reached after travelling `distance` from `(x, y)` along `direction`.
pub fn advance(x: f64, y: f64, direction: Direction, distance: f64) -> (f64, f64) {
    let next = DVec2::new(x, y) + direction.unit() * distance;
    (next.x, next.y)
}

/// Side of the tank that fired the bullet, if that tank is still live.
pub fn side_of_bullet(world: &World, bullet_id: BulletId) -> Option<Side> {
    let bullet = world.bullets.get(&bullet_id)?;
    world.tanks.get(&bullet.owner).map(|tank| tank.side)
}

/// The tank a player currently controls, if the player is active.
pub fn player_tank<'w>(world: &'w World, name: &str) -> Option<&'w Tank> {
    let player = world.players.get(name)?;
    if !player.active {
        return None;
    }
    world.tanks.get(&player.tank_id?)
}

/// Name of the active player controlling `tank`, if any.
pub fn controlling_player<'w>(world: &'w World, tank: &Tank) -> Option<&'w str> {
    world
        .players
        .values()
        .find(|player| player.active && player.tank_id == Some(tank.id))
        .map(|player| player.name.as_str())
}

pub fn live_bullets_of(world: &World, tank: &Tank) -> usize {
    world
        .bullets
        .values()
        .filter(|bullet| bullet.owner == tank.id)
        .count()
}

/// Whether `candidate` (a tank at a proposed position) may occupy the field.
///
/// The tank must stay inside the field and must not overlap brick, steel or
/// river cells, the eagle, or any other tank.
pub fn can_move(world: &World, candidate: &Tank) -> bool {
    let full = tank_box(candidate);
    if !is_inside_field(&full) {
        return false;
    }

    let probe = full.shrink(TANK_TERRAIN_TOLERANCE);
    let blocked_by_terrain = Material::ALL
        .into_iter()
        .filter(|material| material.blocks_tanks())
        .any(|material| world.terrain.overlaps(material, &probe));
    if blocked_by_terrain {
        return false;
    }

    if eagle_box(&world.eagle).collides(&full, -TANK_TERRAIN_TOLERANCE) {
        return false;
    }

    !world
        .tanks
        .values()
        .filter(|other| other.id != candidate.id)
        .any(|other| tank_box(other).collides(&full, -TANK_TERRAIN_TOLERANCE))
}
