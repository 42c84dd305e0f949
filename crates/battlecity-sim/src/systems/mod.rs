//! Processes that react to committed events each tick.
//!
//! Each process reads the snapshot it is handed and only emits events; the
//! per-tick order is fixed by registration order in the engine.

pub mod bullets;
pub mod collision;
pub mod destruction;
pub mod explosion_timers;
pub mod fire_control;
pub mod movement;
pub mod snapshot;
