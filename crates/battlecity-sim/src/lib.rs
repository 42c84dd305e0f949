//! Simulation engine for Battle City.
//!
//! Holds the canonical world as an immutable, versioned value, drives the
//! event processes in a fixed order every tick, and produces
//! `GameStateSnapshot`s for renderers.

pub mod dispatcher;
pub mod engine;
pub mod level;
pub mod queries;
pub mod store;
pub mod systems;
pub mod terrain;
pub mod world;
pub mod world_setup;

pub use battlecity_core as core;
pub use engine::{SimConfig, SimulationEngine, TickReport};
pub use world::World;

#[cfg(test)]
mod tests;
