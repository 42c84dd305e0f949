//! Core types and definitions for the Battle City simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! entity records, events, commands, render snapshots, constants and errors.
//! It has no simulation logic and no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod input;
pub mod state;
pub mod types;
