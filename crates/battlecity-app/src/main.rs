use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use battlecity_app::error::AppError;
use battlecity_app::game_loop::{self, LoopConfig};
use battlecity_app::input::ScriptedInput;
use battlecity_sim::level::Level;
use battlecity_sim::SimConfig;

/// Run a Battle City level headlessly and print the final state as JSON.
#[derive(Parser, Debug)]
#[command(name = "battlecity", version)]
struct Args {
    /// Level file (JSON). Defaults to the built-in first stage.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Input script (JSON) for the player.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of AI tanks to place on the spawn row.
    #[arg(long, default_value_t = 3)]
    ai_tanks: usize,

    /// Player name.
    #[arg(long, default_value = "player-1")]
    player: String,

    /// Pace ticks to wall-clock time.
    #[arg(long)]
    realtime: bool,
}

fn read(path: &PathBuf) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn run(args: Args) -> Result<(), AppError> {
    let level = match &args.level {
        Some(path) => Level::from_json(&read(path)?)?,
        None => Level::stage_1()?,
    };
    let script = match &args.script {
        Some(path) => ScriptedInput::from_json(&read(path)?)?,
        None => ScriptedInput::default(),
    };

    let config = LoopConfig {
        sim: SimConfig {
            seed: args.seed,
            ..Default::default()
        },
        level,
        player: args.player,
        ai_tanks: args.ai_tanks,
        script,
        ticks: args.ticks,
        realtime: args.realtime,
    };

    let outcome = game_loop::spawn_game_loop(config)?.join()?;
    info!(
        "ran {} ticks ({} rolled back)",
        outcome.ticks, outcome.failed_ticks
    );
    println!("{}", serde_json::to_string_pretty(&outcome.final_snapshot)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
