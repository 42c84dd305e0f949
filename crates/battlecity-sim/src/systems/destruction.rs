//! Destruction effects: explosions for destroyed bullets, and the aftermath
//! of a tank losing its last hit point.

use glam::DVec2;

use battlecity_core::components::{Explosion, Tank};
use battlecity_core::constants::{BULLET_SIZE, TANK_SIZE};
use battlecity_core::enums::ExplosionKind;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::ExplosionId;

use crate::dispatcher::Process;
use crate::queries;
use crate::world::World;

#[derive(Default)]
pub struct DestructionEffects {
    next_explosion_id: u32,
}

impl DestructionEffects {
    /// Hand out explosion ids above `last`, the highest id already live.
    pub fn starting_after(last: ExplosionId) -> Self {
        Self {
            next_explosion_id: last.0,
        }
    }

    /// An explosion of `kind` centred on `centre`, with a fresh id.
    fn explosion_at(&mut self, kind: ExplosionKind, centre: DVec2) -> Explosion {
        self.next_explosion_id += 1;
        let origin = centre - DVec2::splat(kind.size() / 2.0);
        Explosion {
            id: ExplosionId(self.next_explosion_id),
            kind,
            x: origin.x,
            y: origin.y,
        }
    }

    fn on_tank_hurt(&mut self, world: &World, tank: &Tank, out: &mut Vec<GameEvent>) {
        if tank.hp > 0 {
            return;
        }
        log::info!("{} ({:?}) destroyed", tank.id, tank.side);

        let centre = DVec2::new(tank.x, tank.y) + DVec2::splat(TANK_SIZE / 2.0);
        out.push(GameEvent::SpawnExplosion {
            explosion: self.explosion_at(ExplosionKind::Tank, centre),
        });
        out.push(GameEvent::RemoveTank { tank_id: tank.id });

        if let Some(name) = queries::controlling_player(world, tank) {
            out.push(GameEvent::DeactivatePlayer {
                name: name.to_owned(),
            });
            out.push(GameEvent::DecrementLife {
                name: name.to_owned(),
            });
        }
    }
}

impl Process for DestructionEffects {
    fn name(&self) -> &'static str {
        "destruction"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        match event {
            GameEvent::DestroyBullets {
                bullets,
                spawn_explosion: true,
            } => {
                for bullet in bullets {
                    let centre = DVec2::new(bullet.x, bullet.y) + DVec2::splat(BULLET_SIZE / 2.0);
                    out.push(GameEvent::SpawnExplosion {
                        explosion: self.explosion_at(ExplosionKind::Bullet, centre),
                    });
                }
            }
            GameEvent::HurtTank { tank_id } => {
                if let Some(tank) = world.tanks.get(tank_id) {
                    self.on_tank_hurt(world, tank, out);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
