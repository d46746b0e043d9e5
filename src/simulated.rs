//! Simulated events handed to component handlers.

use std::cell::Cell;

use crate::native::RawEvent;

/// A raw native event wrapped for one broadcast pass.
///
/// The same instance is passed to every handler in the pass. Handlers may
/// only inspect it, except for [`SimulatedEvent::stop`].
#[derive(Debug)]
pub struct SimulatedEvent {
    raw: RawEvent,
    stopped: Cell<bool>,
}

impl SimulatedEvent {
    pub fn new(raw: RawEvent) -> Self {
        Self {
            raw,
            stopped: Cell::new(false),
        }
    }

    /// The native event this pass was created from.
    pub fn raw(&self) -> &RawEvent {
        &self.raw
    }

    /// Ask the broadcast to skip every handler after the current one.
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}
