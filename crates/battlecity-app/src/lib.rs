//! Headless Battle City runner.
//!
//! Wires a level, a scripted input source and the simulation engine together
//! on a dedicated game loop thread, and publishes the latest snapshot for
//! polling.

pub mod error;
pub mod game_loop;
pub mod input;
pub mod state;

pub use battlecity_core as core;
