//! Bullet advancer: moves every live bullet along its fixed axis once per tick.
//!
//! All advanced bullets are committed as one `UpdateBullets` batch so no
//! reader ever sees a partially advanced set.

use std::collections::BTreeMap;

use battlecity_core::components::Bullet;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::BulletId;

use crate::dispatcher::Process;
use crate::queries;
use crate::world::World;

pub struct BulletAdvancer;

impl Process for BulletAdvancer {
    fn name(&self) -> &'static str {
        "bullets"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        if let GameEvent::Tick { delta } = event {
            if !world.bullets.is_empty() {
                out.push(GameEvent::UpdateBullets {
                    bullets: advance_all(world, *delta),
                });
            }
        }
        Ok(())
    }
}

/// Every live bullet moved by `speed * delta` along its direction.
pub fn advance_all(world: &World, delta: f64) -> BTreeMap<BulletId, Bullet> {
    world
        .bullets
        .iter()
        .map(|(id, bullet)| {
            let distance = bullet.speed * delta;
            let (x, y) = queries::advance(bullet.x, bullet.y, bullet.direction, distance);
            (*id, Bullet { x, y, ..bullet.clone() })
        })
        .collect()
}
