//! Event dispatcher: the single-threaded cooperative scheduler.
//!
//! Each dispatched event is committed to the store, then offered to every
//! process in registration order together with the post-commit snapshot.
//! Emitted events queue behind everything already pending, so events are
//! always committed in arrival order and never interleave.

use std::collections::VecDeque;

use battlecity_core::error::SimError;
use battlecity_core::events::GameEvent;

use crate::store::Store;
use crate::world::World;

/// A long-lived routine reacting to committed events.
///
/// A process only reads the snapshot it is handed and only changes the world
/// by emitting events into `out`.
pub trait Process {
    fn name(&self) -> &'static str;

    fn handle(
        &mut self,
        event: &GameEvent,
        world: &World,
        out: &mut Vec<GameEvent>,
    ) -> Result<(), SimError>;
}

#[derive(Default)]
pub struct Dispatcher {
    processes: Vec<Box<dyn Process>>,
    queue: VecDeque<GameEvent>,
    emitted: Vec<GameEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, process: impl Process + 'static) {
        self.processes.push(Box::new(process));
    }

    pub fn process_names(&self) -> Vec<&'static str> {
        self.processes.iter().map(|p| p.name()).collect()
    }

    /// Dispatch `event` and drain every consequence. Committed events are
    /// appended to `log` in commit order.
    ///
    /// On error the pending queue is dropped; the caller decides whether to
    /// roll the store back.
    pub fn dispatch(
        &mut self,
        store: &mut Store,
        event: GameEvent,
        log: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        self.queue.push_back(event);
        let result = self.drain(store, log);
        if result.is_err() {
            self.queue.clear();
            self.emitted.clear();
        }
        result
    }

    fn drain(&mut self, store: &mut Store, log: &mut Vec<GameEvent>) -> Result<(), SimError> {
        while let Some(event) = self.queue.pop_front() {
            store.commit(&event)?;
            let world = store.snapshot();
            for process in &mut self.processes {
                process.handle(&event, &world, &mut self.emitted)?;
                self.queue.extend(self.emitted.drain(..));
            }
            log.push(event);
        }
        Ok(())
    }
}
