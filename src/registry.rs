//! Per-root registry of mounted components and their event interests.

use std::collections::{BTreeSet, HashMap};
use std::rc::{Rc, Weak};

use crate::component::{Component, Uid};
use crate::error::BroadcastError;
use crate::events::EventId;
use crate::handlers::Handler;

/// Maps broadcast event ids to the mounted components interested in them.
///
/// Holds weak references only; the tree owns the components.
#[derive(Default)]
pub struct EventRegistry {
    components: HashMap<Uid, Weak<Component>>,
    interest: HashMap<EventId, BTreeSet<Uid>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mounted component and every event id its table declares.
    pub fn register(&mut self, component: &Rc<Component>) -> Result<(), BroadcastError> {
        let uid = component.uid();
        if self.components.contains_key(&uid) {
            return Err(BroadcastError::AlreadyMounted(uid));
        }
        self.components.insert(uid, Rc::downgrade(component));
        for id in component.handlers().ids() {
            self.interest.entry(id.clone()).or_default().insert(uid);
        }
        Ok(())
    }

    /// Forget a component. Returns false if it was not registered.
    pub fn unregister(&mut self, uid: Uid) -> bool {
        if self.components.remove(&uid).is_none() {
            return false;
        }
        self.interest.retain(|_, uids| {
            uids.remove(&uid);
            !uids.is_empty()
        });
        true
    }

    pub fn get_by_uid(&self, uid: Uid) -> Option<Rc<Component>> {
        self.components.get(&uid).and_then(Weak::upgrade)
    }

    /// The handler a mounted component declared for an event, if any.
    pub fn lookup(&self, uid: Uid, id: &EventId) -> Option<Handler> {
        if !self.is_interested(uid, id) {
            return None;
        }
        let component = self.get_by_uid(uid)?;
        component.handler_for(id).cloned()
    }

    pub fn is_interested(&self, uid: Uid, id: &EventId) -> bool {
        self.interest.get(id).is_some_and(|uids| uids.contains(&uid))
    }

    /// Whether any mounted component handles the event.
    pub fn has_interest(&self, id: &EventId) -> bool {
        self.interest.contains_key(id)
    }

    /// Uids of mounted components interested in an event, ascending.
    pub fn interested(&self, id: &EventId) -> Vec<Uid> {
        self.interest
            .get(id)
            .map(|uids| uids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.interest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentSpec, GuiFactory};
    use crate::events::{WINDOW_RESIZE, WINDOW_SCROLL};
    use crate::handlers::{EventHandlers, run};

    fn scroller() -> Rc<Component> {
        GuiFactory::build(ComponentSpec::default().with_events(
            EventHandlers::derive([run(WINDOW_SCROLL, |_, _| Ok(()))]).unwrap(),
        ))
    }

    #[test]
    fn lookup_finds_registered_interest() {
        let mut registry = EventRegistry::new();
        let component = scroller();
        registry.register(&component).unwrap();

        assert!(registry.lookup(component.uid(), &WINDOW_SCROLL).is_some());
        assert!(registry.lookup(component.uid(), &WINDOW_RESIZE).is_none());
        assert_eq!(registry.interested(&WINDOW_SCROLL), vec![component.uid()]);
    }

    #[test]
    fn unregister_drops_interest() {
        let mut registry = EventRegistry::new();
        let component = scroller();
        registry.register(&component).unwrap();

        assert!(registry.unregister(component.uid()));
        assert!(!registry.unregister(component.uid()));
        assert!(!registry.has_interest(&WINDOW_SCROLL));
        assert!(registry.lookup(component.uid(), &WINDOW_SCROLL).is_none());
    }

    #[test]
    fn double_register_is_rejected() {
        let mut registry = EventRegistry::new();
        let component = scroller();
        registry.register(&component).unwrap();

        assert!(matches!(
            registry.register(&component),
            Err(BroadcastError::AlreadyMounted(_))
        ));
    }

    #[test]
    fn empty_table_registers_no_interest() {
        let mut registry = EventRegistry::new();
        let component = GuiFactory::build(ComponentSpec::default());
        registry.register(&component).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(!registry.is_interested(component.uid(), &WINDOW_SCROLL));
    }
}
