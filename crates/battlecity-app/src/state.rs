//! State shared between the game loop thread and its controller.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use battlecity_core::commands::Command;
use battlecity_core::state::GameStateSnapshot;

use crate::error::AppError;

/// Latest published snapshot, `None` until the first tick completes.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A command to forward to the simulation engine.
    Command(Command),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// How a game loop run ended.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// Ticks that committed.
    pub ticks: u64,
    /// Ticks that were rolled back.
    pub failed_ticks: u64,
    pub final_snapshot: GameStateSnapshot,
}

/// Handle to a running game loop.
pub struct GameLoopHandle {
    pub command_tx: mpsc::Sender<GameLoopCommand>,
    pub latest_snapshot: SharedSnapshot,
    pub thread: JoinHandle<Result<LoopOutcome, AppError>>,
}

impl GameLoopHandle {
    pub fn send(&self, command: Command) -> bool {
        self.command_tx.send(GameLoopCommand::Command(command)).is_ok()
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(self) -> Result<LoopOutcome, AppError> {
        // The loop may already have finished on its own.
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.join()
    }

    /// Wait for the loop to finish its configured run.
    pub fn join(self) -> Result<LoopOutcome, AppError> {
        self.thread.join().map_err(|_| AppError::LoopPanicked)?
    }
}
