//! Movement controller for player tanks.
//!
//! Keeps the held-direction list per player (most recent press last) and turns
//! it into Turn / Move / StartMove / StopMove events on every Tick.

use std::collections::BTreeMap;

use battlecity_core::components::Tank;
use battlecity_core::enums::Direction;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;

use crate::dispatcher::Process;
use crate::queries;
use crate::world::World;

pub struct MovementController {
    /// Player name -> held directions, most recently pressed last.
    held: BTreeMap<String, Vec<Direction>>,
    speed: f64,
}

impl MovementController {
    pub fn new(speed: f64) -> Self {
        Self {
            held: BTreeMap::new(),
            speed,
        }
    }

    /// Directions currently held by `player`, most recent last.
    pub fn held(&self, player: &str) -> &[Direction] {
        self.held.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    fn on_edge(&mut self, player: &str, direction: Direction, pressed: bool) {
        let held = self.held.entry(player.to_owned()).or_default();
        if pressed {
            if !held.contains(&direction) {
                held.push(direction);
            }
        } else {
            held.retain(|d| *d != direction);
        }
    }
}

impl Process for MovementController {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        match event {
            GameEvent::DirectionEdge {
                player,
                direction,
                pressed,
            } => self.on_edge(player, *direction, *pressed),
            GameEvent::Tick { delta } => {
                for name in world.players.keys() {
                    if let Some(tank) = queries::player_tank(world, name) {
                        step(world, tank, self.held(name), self.speed * delta, out);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// One movement tick for a single tank.
///
/// - Nothing held: stop if moving.
/// - Most recent direction differs from facing: turn only.
/// - Otherwise translate by `distance` if the new position is free.
pub fn step(
    world: &World,
    tank: &Tank,
    held: &[Direction],
    distance: f64,
    out: &mut Vec<GameEvent>,
) {
    let Some(&direction) = held.last() else {
        if tank.moving {
            out.push(GameEvent::StopMove { tank_id: tank.id });
        }
        return;
    };

    if direction != tank.facing {
        out.push(GameEvent::Turn {
            tank_id: tank.id,
            direction,
        });
        return;
    }

    let (x, y) = queries::advance(tank.x, tank.y, direction, distance);
    let candidate = Tank {
        x,
        y,
        ..tank.clone()
    };
    if queries::can_move(world, &candidate) {
        out.push(GameEvent::Move {
            tank_id: tank.id,
            x,
            y,
        });
        if !tank.moving {
            out.push(GameEvent::StartMove { tank_id: tank.id });
        }
    }
}
