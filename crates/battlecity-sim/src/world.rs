//! The canonical world value and its reducer.
//!
//! A `World` is never mutated once published: `apply` builds the next
//! version from the current one and an event.

use std::collections::BTreeMap;

use battlecity_core::components::*;
use battlecity_core::constants::TANK_MAX_COORD;
use battlecity_core::enums::Material;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::{BulletId, ExplosionId, SimTime, TankId};

use crate::terrain::Terrain;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub time: SimTime,
    pub tanks: BTreeMap<TankId, Tank>,
    pub bullets: BTreeMap<BulletId, Bullet>,
    pub explosions: BTreeMap<ExplosionId, Explosion>,
    pub terrain: Terrain,
    pub eagle: Eagle,
    pub players: BTreeMap<String, Player>,
    /// Tank id -> elapsed time at which it may fire again.
    pub cooldowns: BTreeMap<TankId, f64>,
}

impl World {
    /// Compute the world that results from committing `event`.
    ///
    /// Returns `Ok(None)` when the event leaves the world unchanged, including
    /// events that reference entities which are no longer live.
    pub fn apply(&self, event: &GameEvent) -> Result<Option<World>, SimError> {
        let mut next = self.clone();
        let changed = next.reduce(event)?;
        Ok(changed.then_some(next))
    }

    fn reduce(&mut self, event: &GameEvent) -> Result<bool, SimError> {
        let changed = match event {
            GameEvent::Tick { delta } => {
                self.time.advance(*delta);
                true
            }
            GameEvent::AfterTick
            | GameEvent::DirectionEdge { .. }
            | GameEvent::Fire { .. } => false,

            GameEvent::Turn { tank_id, direction } => self
                .tanks
                .get_mut(tank_id)
                .map(|tank| tank.facing = *direction)
                .is_some(),
            GameEvent::Move { tank_id, x, y } => self
                .tanks
                .get_mut(tank_id)
                .map(|tank| {
                    tank.x = x.clamp(0.0, TANK_MAX_COORD);
                    tank.y = y.clamp(0.0, TANK_MAX_COORD);
                })
                .is_some(),
            GameEvent::StartMove { tank_id } => self.set_moving(*tank_id, true),
            GameEvent::StopMove { tank_id } => self.set_moving(*tank_id, false),

            GameEvent::AddBullet { bullet } => {
                if self.bullets.contains_key(&bullet.id) {
                    return Err(SimError::DuplicateId {
                        kind: "bullet",
                        id: bullet.id.0,
                    });
                }
                self.bullets.insert(bullet.id, bullet.clone());
                true
            }
            GameEvent::SetCooldown {
                tank_id,
                ready_at_ms,
            } => {
                self.cooldowns.insert(*tank_id, *ready_at_ms);
                true
            }
            GameEvent::UpdateBullets { bullets } => {
                let mut changed = false;
                for (id, bullet) in bullets {
                    if let Some(live) = self.bullets.get_mut(id) {
                        *live = bullet.clone();
                        changed = true;
                    }
                }
                changed
            }

            GameEvent::DestroyBullets { bullets, .. } => {
                let before = self.bullets.len();
                for bullet in bullets {
                    self.bullets.remove(&bullet.id);
                }
                self.bullets.len() != before
            }
            GameEvent::DestroyBricks { cells } => {
                self.terrain.clear(Material::Brick, cells.iter().copied())
            }
            GameEvent::DestroySteels { cells } => {
                self.terrain.clear(Material::Steel, cells.iter().copied())
            }
            GameEvent::DestroyEagle => !std::mem::replace(&mut self.eagle.broken, true),
            GameEvent::HurtTank { tank_id } => match self.tanks.get_mut(tank_id) {
                Some(tank) if tank.hp > 0 => {
                    tank.hp -= 1;
                    true
                }
                _ => false,
            },

            GameEvent::SpawnExplosion { explosion } => {
                if self.explosions.contains_key(&explosion.id) {
                    return Err(SimError::DuplicateId {
                        kind: "explosion",
                        id: explosion.id.0,
                    });
                }
                self.explosions.insert(explosion.id, explosion.clone());
                true
            }
            GameEvent::RemoveExplosion { explosion_id } => {
                self.explosions.remove(explosion_id).is_some()
            }

            GameEvent::SpawnTank { tank } => {
                if self.tanks.contains_key(&tank.id) {
                    return Err(SimError::DuplicateId {
                        kind: "tank",
                        id: tank.id.0,
                    });
                }
                self.tanks.insert(tank.id, tank.clone());
                true
            }
            GameEvent::RemoveTank { tank_id } => {
                self.cooldowns.remove(tank_id);
                self.tanks.remove(tank_id).is_some()
            }

            GameEvent::CreatePlayer { name, lives } => {
                self.players.insert(
                    name.clone(),
                    Player {
                        name: name.clone(),
                        tank_id: None,
                        active: false,
                        lives: *lives,
                    },
                );
                true
            }
            GameEvent::ActivatePlayer { name, tank_id } => self
                .players
                .get_mut(name)
                .map(|player| {
                    player.tank_id = Some(*tank_id);
                    player.active = true;
                })
                .is_some(),
            GameEvent::DeactivatePlayer { name } => self
                .players
                .get_mut(name)
                .map(|player| player.active = false)
                .is_some(),
            GameEvent::DeactivateAllPlayers => {
                let mut changed = false;
                for player in self.players.values_mut().filter(|p| p.active) {
                    player.active = false;
                    changed = true;
                }
                changed
            }
            GameEvent::DecrementLife { name } => self
                .players
                .get_mut(name)
                .map(|player| player.lives = player.lives.saturating_sub(1))
                .is_some(),
            GameEvent::AddOneLife { name } => self
                .players
                .get_mut(name)
                .map(|player| player.lives = player.lives.saturating_add(1))
                .is_some(),
            GameEvent::RemovePlayer { name } => self.players.remove(name).is_some(),
        };
        Ok(changed)
    }

    fn set_moving(&mut self, tank_id: TankId, moving: bool) -> bool {
        match self.tanks.get_mut(&tank_id) {
            Some(tank) if tank.moving != moving => {
                tank.moving = moving;
                true
            }
            _ => false,
        }
    }
}
