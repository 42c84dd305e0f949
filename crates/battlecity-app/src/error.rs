use battlecity_core::error::SimError;
use battlecity_sim::level::LevelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("level: {0}")]
    Level(#[from] LevelError),
    #[error("simulation: {0}")]
    Sim(#[from] SimError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start game loop thread: {0}")]
    Spawn(std::io::Error),
    #[error("game loop thread panicked")]
    LoopPanicked,
}
