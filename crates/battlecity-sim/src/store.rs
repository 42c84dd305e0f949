//! Versioned canonical store.
//!
//! The store publishes `Arc<World>` snapshots. Readers keep whatever version
//! they were handed; a commit swaps in a new value and never touches the old.

use std::sync::Arc;

use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;

use crate::world::World;

#[derive(Debug, Clone)]
pub struct Store {
    current: Arc<World>,
    version: u64,
}

impl Store {
    pub fn new(world: World) -> Self {
        Self {
            current: Arc::new(world),
            version: 0,
        }
    }

    /// Cheap handle to the current version.
    pub fn snapshot(&self) -> Arc<World> {
        Arc::clone(&self.current)
    }

    pub fn world(&self) -> &World {
        &self.current
    }

    /// Incremented once per state-changing commit or restore.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Commit one event. Returns whether the world changed.
    pub fn commit(&mut self, event: &GameEvent) -> Result<bool, SimError> {
        match self.current.apply(event)? {
            Some(next) => {
                self.current = Arc::new(next);
                self.version += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Roll back to an earlier snapshot.
    pub fn restore(&mut self, snapshot: Arc<World>) {
        if !Arc::ptr_eq(&self.current, &snapshot) {
            self.current = snapshot;
            self.version += 1;
        }
    }
}
