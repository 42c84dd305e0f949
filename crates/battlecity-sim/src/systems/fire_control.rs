//! Fire control: turns fire intents into bullets, gated by cooldown and the
//! per-tank live bullet limit.

use battlecity_core::components::{Bullet, Tank};
use battlecity_core::constants::*;
use battlecity_core::enums::Direction;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::BulletId;

use crate::dispatcher::Process;
use crate::queries;
use crate::world::World;

#[derive(Default)]
pub struct FireControl {
    next_bullet_id: u32,
}

impl FireControl {
    /// Hand out bullet ids above `last`, the highest id already live.
    pub fn starting_after(last: BulletId) -> Self {
        Self {
            next_bullet_id: last.0,
        }
    }

    fn allocate_id(&mut self) -> BulletId {
        self.next_bullet_id += 1;
        BulletId(self.next_bullet_id)
    }
}

impl Process for FireControl {
    fn name(&self) -> &'static str {
        "fire_control"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        let GameEvent::Fire { tank_id } = event else {
            return Ok(());
        };
        let Some(tank) = world.tanks.get(tank_id) else {
            return Ok(());
        };
        if !can_fire(world, tank) {
            return Ok(());
        }

        let bullet = muzzle_bullet(self.allocate_id(), tank);
        log::debug!("{} fired {}", tank.id, bullet.id);
        out.push(GameEvent::AddBullet { bullet });
        out.push(GameEvent::SetCooldown {
            tank_id: tank.id,
            ready_at_ms: world.time.elapsed_ms + FIRE_COOLDOWN_MS,
        });
        Ok(())
    }
}

/// Cooldown elapsed and below the live bullet limit.
pub fn can_fire(world: &World, tank: &Tank) -> bool {
    let ready_at = world.cooldowns.get(&tank.id).copied().unwrap_or(0.0);
    world.time.elapsed_ms >= ready_at
        && queries::live_bullets_of(world, tank) < MAX_LIVE_BULLETS_PER_TANK
}

/// A new bullet at the middle of the tank's front edge, inside the tank box.
pub fn muzzle_bullet(id: BulletId, tank: &Tank) -> Bullet {
    let centre = (TANK_SIZE - BULLET_SIZE) / 2.0;
    let far = TANK_SIZE - BULLET_SIZE;
    let (dx, dy) = match tank.facing {
        Direction::Up => (centre, 0.0),
        Direction::Down => (centre, far),
        Direction::Left => (0.0, centre),
        Direction::Right => (far, centre),
    };
    Bullet {
        id,
        owner: tank.id,
        direction: tank.facing,
        speed: tank.bullet_speed,
        power: tank.bullet_power,
        x: tank.x + dx,
        y: tank.y + dy,
    }
}
