//! Simulation engine: the entry point for driving a game.
//!
//! `SimulationEngine` owns the versioned store, the dispatcher with its
//! processes, and the seeded RNG. It turns commands into events, runs the
//! Tick / AfterTick phases, and produces `GameStateSnapshot`s. Completely
//! headless, so every scenario can be tested deterministically.

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, error, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use battlecity_core::commands::Command;
use battlecity_core::constants::PLAYER_TANK_SPEED;
use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;
use battlecity_core::input::InputAdapter;
use battlecity_core::state::GameStateSnapshot;
use battlecity_core::types::{BulletId, ExplosionId, SimTime, TankId};

use crate::dispatcher::{Dispatcher, Process};
use crate::level::Level;
use crate::queries;
use crate::store::Store;
use crate::systems;
use crate::systems::bullets::BulletAdvancer;
use crate::systems::collision::CollisionResolver;
use crate::systems::destruction::DestructionEffects;
use crate::systems::explosion_timers::ExplosionTimers;
use crate::systems::fire_control::FireControl;
use crate::systems::movement::MovementController;
use crate::world::World;
use crate::world_setup::{self, TankTemplate};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Player tank speed in units per millisecond.
    pub player_speed: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player_speed: PLAYER_TANK_SPEED,
        }
    }
}

/// What one successful tick committed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Every committed event, in commit order.
    pub events: Vec<GameEvent>,
}

pub struct SimulationEngine {
    store: Store,
    dispatcher: Dispatcher,
    rng: ChaCha8Rng,
    next_tank_id: u32,
    command_queue: VecDeque<Command>,
}

impl SimulationEngine {
    /// Create an engine over an empty field.
    pub fn new(config: SimConfig) -> Self {
        Self::with_world(config, World::default())
    }

    /// Create an engine over a prepared world.
    pub fn with_world(config: SimConfig, world: World) -> Self {
        // Id counters continue above whatever the prepared world already holds.
        let next_tank_id = world.tanks.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        let last_bullet = world.bullets.keys().max().copied().unwrap_or(BulletId(0));
        let last_explosion = world
            .explosions
            .keys()
            .max()
            .copied()
            .unwrap_or(ExplosionId(0));

        let mut dispatcher = Dispatcher::new();
        dispatcher.register(MovementController::new(config.player_speed));
        dispatcher.register(FireControl::starting_after(last_bullet));
        dispatcher.register(BulletAdvancer);
        dispatcher.register(ExplosionTimers::new());
        dispatcher.register(CollisionResolver);
        dispatcher.register(DestructionEffects::starting_after(last_explosion));

        Self {
            store: Store::new(world),
            dispatcher,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_tank_id,
            command_queue: VecDeque::new(),
        }
    }

    /// Create an engine over the terrain and eagle of `level`.
    pub fn from_level(config: SimConfig, level: &Level) -> Self {
        Self::with_world(config, world_setup::world_from_level(level))
    }

    /// Replace the world with a fresh one built from `level`.
    pub fn load_level(&mut self, level: &Level) {
        debug!("loading level {:?}", level.name);
        self.store.restore(Arc::new(world_setup::world_from_level(level)));
        self.command_queue.clear();
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: Command) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.command_queue.extend(commands);
    }

    /// Register an extra process. It runs after the built-in ones, in
    /// registration order.
    pub fn register_process(&mut self, process: impl Process + 'static) {
        self.dispatcher.register(process);
    }

    /// Drain pending edges and the fire latch from `adapter` into commands
    /// for `player`.
    pub fn feed_input(&mut self, player: &str, adapter: &mut impl InputAdapter) {
        for edge in adapter.poll_edges() {
            let player = player.to_owned();
            self.queue_command(if edge.pressed {
                Command::Press {
                    player,
                    direction: edge.direction,
                }
            } else {
                Command::Release {
                    player,
                    direction: edge.direction,
                }
            });
        }
        if adapter.poll_fire() {
            let tank_id = queries::player_tank(self.store.world(), player).map(|tank| tank.id);
            if let Some(tank_id) = tank_id {
                self.queue_command(Command::Fire { tank_id });
            }
        }
    }

    /// Register a player with `lives` spare tanks.
    pub fn create_player(&mut self, name: &str, lives: u32) -> Result<(), SimError> {
        self.apply(GameEvent::CreatePlayer {
            name: name.to_owned(),
            lives,
        })?;
        Ok(())
    }

    /// Spawn a tank from `template`. Returns `Ok(None)` when the template has
    /// no fixed position and every spawn slot is occupied.
    pub fn spawn_tank(&mut self, template: &TankTemplate) -> Result<Option<TankId>, SimError> {
        let position = match template.position {
            Some(position) => position,
            None => match world_setup::pick_spawn_slot(self.store.world(), &mut self.rng) {
                Some(position) => position,
                None => {
                    warn!("no free spawn slot for {:?} tank", template.side);
                    return Ok(None);
                }
            },
        };

        let id = TankId(self.next_tank_id);
        self.next_tank_id += 1;
        let tank = world_setup::make_tank(id, template, position);
        debug!("spawning {id} at ({}, {})", tank.x, tank.y);
        self.apply(GameEvent::SpawnTank { tank })?;
        Ok(Some(id))
    }

    /// Spawn a tank for `name` and hand it control. Players without lives
    /// left get nothing.
    pub fn spawn_player_tank(
        &mut self,
        name: &str,
        template: &TankTemplate,
    ) -> Result<Option<TankId>, SimError> {
        let Some(player) = self.store.world().players.get(name) else {
            return Err(SimError::InvariantViolation(format!(
                "unknown player {name:?}"
            )));
        };
        if player.lives == 0 {
            return Ok(None);
        }

        let Some(tank_id) = self.spawn_tank(template)? else {
            return Ok(None);
        };
        self.apply(GameEvent::ActivatePlayer {
            name: name.to_owned(),
            tank_id,
        })?;
        Ok(Some(tank_id))
    }

    /// Dispatch a single event outside the tick cycle and drain its
    /// consequences. The world is rolled back if anything fails.
    pub fn apply(&mut self, event: GameEvent) -> Result<Vec<GameEvent>, SimError> {
        let before = self.store.snapshot();
        let mut log = Vec::new();
        if let Err(err) = self.dispatcher.dispatch(&mut self.store, event, &mut log) {
            self.store.restore(before);
            error!("event rejected: {err}");
            return Err(err);
        }
        Ok(log)
    }

    /// Advance the simulation by `delta_ms` milliseconds.
    ///
    /// Either the whole tick commits or the world is left exactly as it was
    /// before the call.
    pub fn tick(&mut self, delta_ms: f64) -> Result<TickReport, SimError> {
        let before = self.store.snapshot();
        let mut events = Vec::new();

        if let Err(err) = self.run_tick(delta_ms, &mut events) {
            let tick = before.time.tick + 1;
            self.store.restore(before);
            error!("tick {tick} aborted: {err}");
            return Err(err);
        }

        Ok(TickReport {
            tick: self.store.world().time.tick,
            events,
        })
    }

    fn run_tick(&mut self, delta_ms: f64, log: &mut Vec<GameEvent>) -> Result<(), SimError> {
        while let Some(command) = self.command_queue.pop_front() {
            let event = command_event(command);
            self.dispatcher.dispatch(&mut self.store, event, log)?;
        }
        self.dispatcher
            .dispatch(&mut self.store, GameEvent::Tick { delta: delta_ms }, log)?;
        self.dispatcher
            .dispatch(&mut self.store, GameEvent::AfterTick, log)
    }

    /// The current committed world.
    pub fn world(&self) -> Arc<World> {
        self.store.snapshot()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn time(&self) -> SimTime {
        self.store.world().time
    }

    /// Names of the registered processes, in dispatch order.
    pub fn process_names(&self) -> Vec<&'static str> {
        self.dispatcher.process_names()
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(self.store.world(), self.store.version())
    }
}

fn command_event(command: Command) -> GameEvent {
    match command {
        Command::Press { player, direction } => GameEvent::DirectionEdge {
            player,
            direction,
            pressed: true,
        },
        Command::Release { player, direction } => GameEvent::DirectionEdge {
            player,
            direction,
            pressed: false,
        },
        Command::Fire { tank_id } => GameEvent::Fire { tank_id },
        Command::RemoveTank { tank_id } => GameEvent::RemoveTank { tank_id },
    }
}
