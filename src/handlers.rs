//! Per-component handler tables.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use color_eyre::eyre::Result;

use crate::component::Component;
use crate::error::BroadcastError;
use crate::events::EventId;
use crate::simulated::SimulatedEvent;

/// Handler invoked when a component receives a broadcast.
pub type Handler = Rc<dyn Fn(&Component, &SimulatedEvent) -> Result<()>>;

/// One `(event id, handler)` pair, produced by [`run`].
pub struct HandlerEntry {
    id: EventId,
    handler: Handler,
}

/// Declare a handler for an event id.
pub fn run<F>(id: EventId, handler: F) -> HandlerEntry
where
    F: Fn(&Component, &SimulatedEvent) -> Result<()> + 'static,
{
    HandlerEntry {
        id,
        handler: Rc::new(handler),
    }
}

/// Immutable map from event id to handler, fixed when a component is built.
#[derive(Clone, Default)]
pub struct EventHandlers {
    table: BTreeMap<EventId, Handler>,
}

impl EventHandlers {
    /// Build a table from handler entries.
    ///
    /// A component has at most one handler per event id; declaring the same
    /// id twice is rejected.
    pub fn derive(entries: impl IntoIterator<Item = HandlerEntry>) -> Result<Self, BroadcastError> {
        let mut table = BTreeMap::new();
        for entry in entries {
            if table.contains_key(&entry.id) {
                return Err(BroadcastError::DuplicateHandler(entry.id));
            }
            table.insert(entry.id, entry.handler);
        }
        Ok(Self { table })
    }

    pub fn get(&self, id: &EventId) -> Option<&Handler> {
        self.table.get(id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.table.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &EventId> {
        self.table.keys()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{WINDOW_RESIZE, WINDOW_SCROLL};

    #[test]
    fn derive_rejects_duplicate_ids() {
        let result = EventHandlers::derive([
            run(WINDOW_SCROLL, |_, _| Ok(())),
            run(WINDOW_SCROLL, |_, _| Ok(())),
        ]);

        assert!(matches!(
            result,
            Err(BroadcastError::DuplicateHandler(id)) if id == WINDOW_SCROLL
        ));
    }

    #[test]
    fn missing_id_is_none() {
        let handlers = EventHandlers::derive([run(WINDOW_SCROLL, |_, _| Ok(()))]).unwrap();

        assert!(handlers.contains(&WINDOW_SCROLL));
        assert!(handlers.get(&WINDOW_RESIZE).is_none());
        assert_eq!(handlers.len(), 1);
    }
}
