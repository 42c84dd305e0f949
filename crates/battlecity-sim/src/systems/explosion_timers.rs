//! Delayed removal of explosions.
//!
//! Each spawned explosion gets a deadline; the first Tick at or past it emits
//! exactly one `RemoveExplosion` for that id.

use std::collections::BTreeMap;

use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::types::ExplosionId;

use crate::dispatcher::Process;
use crate::world::World;

#[derive(Default)]
pub struct ExplosionTimers {
    /// Explosion id -> elapsed time at which it is removed.
    deadlines: BTreeMap<ExplosionId, f64>,
}

impl ExplosionTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }
}

impl Process for ExplosionTimers {
    fn name(&self) -> &'static str {
        "explosion_timers"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        match event {
            GameEvent::SpawnExplosion { explosion } => {
                let deadline = world.time.elapsed_ms + explosion.kind.duration_ms();
                self.deadlines.insert(explosion.id, deadline);
            }
            GameEvent::RemoveExplosion { explosion_id } => {
                self.deadlines.remove(explosion_id);
            }
            GameEvent::Tick { .. } => {
                let now = world.time.elapsed_ms;
                // Keep the timer set in step with the world after a rollback:
                // drop ids that no longer exist, adopt ones we never saw spawn.
                self.deadlines
                    .retain(|id, _| world.explosions.contains_key(id));
                for explosion in world.explosions.values() {
                    self.deadlines
                        .entry(explosion.id)
                        .or_insert(now + explosion.kind.duration_ms());
                }
                let expired: Vec<ExplosionId> = self
                    .deadlines
                    .iter()
                    .filter(|(_, deadline)| **deadline <= now)
                    .map(|(id, _)| *id)
                    .collect();
                for explosion_id in expired {
                    self.deadlines.remove(&explosion_id);
                    out.push(GameEvent::RemoveExplosion { explosion_id });
                }
            }
            _ => {}
        }
        Ok(())
    }
}
