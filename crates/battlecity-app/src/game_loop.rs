//! Game loop thread: runs the simulation engine at `TICK_RATE` and publishes
//! snapshots.
//!
//! The engine is created inside this thread because it's cleaner for
//! ownership. Commands arrive via an `mpsc` channel. The latest snapshot is
//! stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use battlecity_core::constants::{DEFAULT_PLAYER_LIVES, TICK_MS, TICK_RATE};
use battlecity_core::state::GameStateSnapshot;
use battlecity_sim::level::Level;
use battlecity_sim::world_setup::TankTemplate;
use battlecity_sim::{SimConfig, SimulationEngine};

use crate::error::AppError;
use crate::input::ScriptedInput;
use crate::state::{GameLoopCommand, GameLoopHandle, LoopOutcome, SharedSnapshot};

/// Wall-clock duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Everything the loop needs to build and drive a game.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub sim: SimConfig,
    pub level: Level,
    pub player: String,
    pub ai_tanks: usize,
    pub script: ScriptedInput,
    /// Number of ticks to run before stopping on its own.
    pub ticks: u64,
    /// Pace ticks to wall-clock time instead of running flat out.
    pub realtime: bool,
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(config: LoopConfig) -> Result<GameLoopHandle, AppError> {
    let (command_tx, command_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("battlecity-game-loop".into())
        .spawn(move || run_game_loop(config, command_rx, &shared))
        .map_err(AppError::Spawn)?;

    Ok(GameLoopHandle {
        command_tx,
        latest_snapshot,
        thread,
    })
}

/// Build an engine for `config`: level, player tank and AI tanks.
pub fn setup_engine(config: &LoopConfig) -> Result<SimulationEngine, AppError> {
    let mut engine = SimulationEngine::from_level(config.sim.clone(), &config.level);
    engine.create_player(&config.player, DEFAULT_PLAYER_LIVES)?;
    if engine
        .spawn_player_tank(&config.player, &TankTemplate::player())?
        .is_none()
    {
        warn!("player {} could not be placed", config.player);
    }
    for _ in 0..config.ai_tanks {
        engine.spawn_tank(&TankTemplate::ai())?;
    }
    info!(
        "level {:?} ready with {} tanks",
        config.level.name,
        engine.world().tanks.len()
    );
    Ok(engine)
}

/// The game loop. Runs until the tick budget is spent, a Shutdown command
/// arrives, or the channel disconnects.
fn run_game_loop(
    mut config: LoopConfig,
    command_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> Result<LoopOutcome, AppError> {
    let mut engine = setup_engine(&config)?;
    let mut outcome = LoopOutcome {
        ticks: 0,
        failed_ticks: 0,
        final_snapshot: engine.snapshot(),
    };
    let mut next_tick_time = Instant::now();

    for _ in 0..config.ticks {
        // 1. Drain all pending commands
        if drain_commands(&command_rx, &mut engine) {
            debug!("game loop stopping after {} ticks", outcome.ticks);
            break;
        }

        // 2. Scripted input for this tick
        engine.feed_input(&config.player, &mut config.script);

        // 3. Advance one tick; a failed tick has already been rolled back
        match engine.tick(TICK_MS) {
            Ok(_) => outcome.ticks += 1,
            Err(err) => {
                warn!("skipping failed tick: {err}");
                outcome.failed_ticks += 1;
            }
        }

        // 4. Store latest snapshot for synchronous polling
        let snapshot = engine.snapshot();
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next tick
        if config.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind, reset to avoid a catch-up spiral
                next_tick_time = now;
            }
        }
    }

    outcome.final_snapshot = engine.snapshot();
    Ok(outcome)
}

/// Forward queued commands to the engine. Returns true when the loop should
/// stop.
fn drain_commands(
    command_rx: &mpsc::Receiver<GameLoopCommand>,
    engine: &mut SimulationEngine,
) -> bool {
    loop {
        match command_rx.try_recv() {
            Ok(GameLoopCommand::Command(command)) => engine.queue_command(command),
            Ok(GameLoopCommand::Shutdown) => return true,
            Err(mpsc::TryRecvError::Empty) => return false,
            // The controller dropped its handle; keep running the script.
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}
