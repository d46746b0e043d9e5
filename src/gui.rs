//! The UI root: owns the component tree and its native subscriptions.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::{debug, info, warn};

#[cfg(debug_assertions)]
use tracing::instrument;

use crate::component::{Component, ComponentSpec, Dom, GuiFactory, Uid};
use crate::dispatcher::{Disposer, RootDispatcher};
use crate::error::BroadcastError;
use crate::events::EventId;
use crate::native::{NativeWindow, RawEvent};
use crate::registry::EventRegistry;
use crate::simulated::SimulatedEvent;

/// Result of one broadcast pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastOutcome {
    pub event: EventId,
    /// Components whose handler ran, in invocation order
    pub delivered: Vec<Uid>,
    /// A handler called `stop()` and the rest of the pass was skipped
    pub stopped: bool,
}

impl BroadcastOutcome {
    fn empty(event: &EventId) -> Self {
        Self {
            event: event.clone(),
            delivered: Vec::new(),
            stopped: false,
        }
    }
}

/// Top-level owner of a mounted component tree.
///
/// Everything is single-threaded: broadcasts run synchronously on the
/// caller's thread and a pass always completes before the call returns.
pub struct Gui {
    me: Weak<Gui>,
    root: Rc<Component>,
    registry: RefCell<EventRegistry>,
    dispatcher: RootDispatcher,
    torn_down: Cell<bool>,
}

impl Gui {
    /// Create an empty root with a mounted root container.
    pub fn create() -> Rc<Self> {
        let root = GuiFactory::build(ComponentSpec::container(
            Dom::tag("div")
                .with_class("tuicast-root")
                .with_attr("data-name", "root"),
        ));
        root.set_mounted(true);
        let mut registry = EventRegistry::new();
        // A freshly built component cannot already be registered
        let _ = registry.register(&root);

        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            root,
            registry: RefCell::new(registry),
            dispatcher: RootDispatcher::new(),
            torn_down: Cell::new(false),
        })
    }

    /// The root container every mounted component descends from.
    pub fn root(&self) -> &Rc<Component> {
        &self.root
    }

    pub fn registry(&self) -> Ref<'_, EventRegistry> {
        self.registry.borrow()
    }

    pub fn dispatcher(&self) -> &RootDispatcher {
        &self.dispatcher
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    pub fn get_by_uid(&self, uid: Uid) -> Option<Rc<Component>> {
        self.registry.borrow().get_by_uid(uid)
    }

    /// Mount a component (and its subtree) under the root container.
    pub fn add(&self, component: Rc<Component>) -> Result<(), BroadcastError> {
        self.add_to(self.root.uid(), component)
    }

    /// Mount a component (and its subtree) as the last child of `parent`.
    pub fn add_to(&self, parent: Uid, component: Rc<Component>) -> Result<(), BroadcastError> {
        if self.torn_down.get() {
            return Err(BroadcastError::TornDown);
        }
        let parent = self
            .get_by_uid(parent)
            .ok_or(BroadcastError::UnknownParent(parent))?;
        if component.is_mounted() {
            return Err(BroadcastError::AlreadyMounted(component.uid()));
        }

        let subtree = component.descendants();
        {
            let mut registry = self.registry.borrow_mut();
            for (idx, node) in subtree.iter().enumerate() {
                if let Err(e) = registry.register(node) {
                    for registered in &subtree[..idx] {
                        registry.unregister(registered.uid());
                    }
                    return Err(e);
                }
            }
        }
        for node in &subtree {
            node.set_mounted(true);
        }
        parent.push_child(component);
        debug!(parent = %parent.uid(), count = subtree.len(), "components mounted");
        Ok(())
    }

    /// Unmount a component and its subtree, returning it to the caller.
    ///
    /// The root container itself is only released by [`Gui::teardown`].
    pub fn remove(&self, uid: Uid) -> Result<Rc<Component>, BroadcastError> {
        if uid == self.root.uid() {
            return Err(BroadcastError::NotMounted(uid));
        }
        let component = self.get_by_uid(uid).ok_or(BroadcastError::NotMounted(uid))?;
        let parent = component.parent().ok_or(BroadcastError::NotMounted(uid))?;
        parent.remove_child(uid);

        let subtree = component.descendants();
        let mut registry = self.registry.borrow_mut();
        for node in &subtree {
            registry.unregister(node.uid());
            node.set_mounted(false);
        }
        debug!(uid = %uid, count = subtree.len(), "components unmounted");
        Ok(component)
    }

    /// Build a spec and mount it under the root container.
    pub fn mount(&self, spec: ComponentSpec) -> Result<Rc<Component>, BroadcastError> {
        let component = GuiFactory::build(spec);
        self.add(Rc::clone(&component))?;
        Ok(component)
    }

    /// Deliver an event to every mounted component that handles it.
    ///
    /// Handlers run synchronously in depth-first mount order, all receiving
    /// the same simulated event. The list of targets is fixed when the pass
    /// starts: components mounted by a handler are not visited, components
    /// unmounted by a handler are skipped. The first handler error ends the
    /// pass and is returned.
    #[cfg_attr(debug_assertions, instrument(skip(self, raw), fields(event = %id)))]
    pub fn broadcast_event(
        &self,
        id: &EventId,
        raw: RawEvent,
    ) -> Result<BroadcastOutcome, BroadcastError> {
        self.broadcast_filtered(id, raw, None)
    }

    /// Like [`Gui::broadcast_event`], restricted to the given components.
    pub fn broadcast_on(
        &self,
        targets: &[Uid],
        id: &EventId,
        raw: RawEvent,
    ) -> Result<BroadcastOutcome, BroadcastError> {
        let targets: HashSet<Uid> = targets.iter().copied().collect();
        self.broadcast_filtered(id, raw, Some(&targets))
    }

    fn broadcast_filtered(
        &self,
        id: &EventId,
        raw: RawEvent,
        only: Option<&HashSet<Uid>>,
    ) -> Result<BroadcastOutcome, BroadcastError> {
        let snapshot: Vec<Rc<Component>> = {
            let registry = self.registry.borrow();
            if !registry.has_interest(id) {
                return Ok(BroadcastOutcome::empty(id));
            }
            self.root
                .descendants()
                .into_iter()
                .filter(|c| registry.is_interested(c.uid(), id))
                .filter(|c| only.is_none_or(|set| set.contains(&c.uid())))
                .collect()
        };

        let event = SimulatedEvent::new(raw);
        let mut outcome = BroadcastOutcome::empty(id);
        for component in snapshot {
            if !component.is_mounted() {
                continue;
            }
            let Some(handler) = component.handler_for(id) else {
                continue;
            };
            if let Err(source) = handler(component.as_ref(), &event) {
                warn!(uid = %component.uid(), event = %id, error = %source, "handler failed");
                return Err(BroadcastError::HandlerFault {
                    uid: component.uid(),
                    event: id.clone(),
                    source,
                });
            }
            outcome.delivered.push(component.uid());
            if event.is_stopped() {
                outcome.stopped = true;
                break;
            }
        }
        debug!(
            event = %id,
            delivered = outcome.delivered.len(),
            stopped = outcome.stopped,
            "broadcast complete"
        );
        Ok(outcome)
    }

    /// Forward native `external_type` events from `window` as `internal`
    /// broadcasts on this root.
    ///
    /// Only one native listener is attached per window and external type.
    /// Repeating a call returns a disposer for the existing subscription;
    /// naming a different internal event for it is a
    /// [`BroadcastError::ConflictingSubscription`].
    pub fn subscribe(
        &self,
        window: &Rc<NativeWindow>,
        external_type: &str,
        internal: EventId,
    ) -> Result<Disposer, BroadcastError> {
        if self.torn_down.get() {
            return Err(BroadcastError::TornDown);
        }
        self.dispatcher
            .subscribe(self.me.clone(), window, external_type, internal)
    }

    /// Release every native subscription and unmount the whole tree.
    ///
    /// Safe to call more than once.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        let released = self.dispatcher.unsubscribe_all();
        for node in self.root.descendants() {
            node.set_mounted(false);
        }
        self.root.clear_children();
        self.registry.borrow_mut().clear();
        info!(released, "UI root torn down");
    }
}

impl Drop for Gui {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{WINDOW_RESIZE, WINDOW_SCROLL};
    use crate::handlers::{EventHandlers, run};
    use color_eyre::eyre::eyre;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &str, id: EventId) -> ComponentSpec {
        let log = Rc::clone(log);
        ComponentSpec::container(Dom::tag("div").with_attr("data-name", name)).with_events(
            EventHandlers::derive([run(id, move |component, _| {
                log.borrow_mut().push(component.name());
                Ok(())
            })])
            .unwrap(),
        )
    }

    fn scroll() -> RawEvent {
        RawEvent::Scroll { x: 0, y: 10 }
    }

    #[test]
    fn broadcast_visits_interested_components_in_tree_order() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        let parent = recorder(&log, "a", WINDOW_SCROLL).with_components(vec![
            recorder(&log, "b", WINDOW_RESIZE),
            recorder(&log, "c", WINDOW_SCROLL),
        ]);
        gui.mount(parent).unwrap();
        gui.mount(recorder(&log, "d", WINDOW_SCROLL)).unwrap();

        let outcome = gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();

        assert_eq!(*log.borrow(), ["a", "c", "d"]);
        assert_eq!(outcome.delivered.len(), 3);
        assert!(!outcome.stopped);
    }

    #[test]
    fn handler_fault_stops_the_pass() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        let faulty = gui
            .mount(ComponentSpec::default().with_events(
                EventHandlers::derive([run(WINDOW_SCROLL, |_, _| Err(eyre!("broken")))]).unwrap(),
            ))
            .unwrap();
        gui.mount(recorder(&log, "after", WINDOW_SCROLL)).unwrap();

        let err = gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap_err();

        assert!(matches!(err, BroadcastError::HandlerFault { uid, .. } if uid == faulty.uid()));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn stop_skips_remaining_handlers() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        gui.mount(ComponentSpec::default().with_events(
            EventHandlers::derive([run(WINDOW_SCROLL, |_, event| {
                event.stop();
                Ok(())
            })])
            .unwrap(),
        ))
        .unwrap();
        gui.mount(recorder(&log, "after", WINDOW_SCROLL)).unwrap();

        let outcome = gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();

        assert!(outcome.stopped);
        assert_eq!(outcome.delivered.len(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn handler_removing_a_later_component_skips_it() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        let victim = Rc::new(Cell::new(None));

        let weak_gui = Rc::downgrade(&gui);
        let target = Rc::clone(&victim);
        gui.mount(ComponentSpec::default().with_events(
            EventHandlers::derive([run(WINDOW_SCROLL, move |_, _| {
                if let (Some(gui), Some(uid)) = (weak_gui.upgrade(), target.get()) {
                    gui.remove(uid)?;
                }
                Ok(())
            })])
            .unwrap(),
        ))
        .unwrap();
        let later = gui.mount(recorder(&log, "later", WINDOW_SCROLL)).unwrap();
        victim.set(Some(later.uid()));

        gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();

        assert!(log.borrow().is_empty());
        assert!(gui.get_by_uid(later.uid()).is_none());
    }

    #[test]
    fn handler_mounting_a_component_does_not_visit_it() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));

        let weak_gui = Rc::downgrade(&gui);
        let inner_log = Rc::clone(&log);
        gui.mount(ComponentSpec::default().with_events(
            EventHandlers::derive([run(WINDOW_SCROLL, move |_, _| {
                if let Some(gui) = weak_gui.upgrade() {
                    gui.mount(recorder(&inner_log, "late", WINDOW_SCROLL))?;
                }
                Ok(())
            })])
            .unwrap(),
        ))
        .unwrap();

        gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();
        assert!(log.borrow().is_empty());

        gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();
        assert_eq!(*log.borrow(), ["late"]);
    }

    #[test]
    fn broadcast_on_limits_targets() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        gui.mount(recorder(&log, "a", WINDOW_SCROLL)).unwrap();
        let b = gui.mount(recorder(&log, "b", WINDOW_SCROLL)).unwrap();

        gui.broadcast_on(&[b.uid()], &WINDOW_SCROLL, scroll()).unwrap();

        assert_eq!(*log.borrow(), ["b"]);
    }

    #[test]
    fn remove_unregisters_subtree() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        let parent = gui
            .mount(
                recorder(&log, "a", WINDOW_SCROLL)
                    .with_components(vec![recorder(&log, "b", WINDOW_SCROLL)]),
            )
            .unwrap();
        let child = parent.children()[0].clone();

        let removed = gui.remove(parent.uid()).unwrap();

        assert!(!removed.is_mounted());
        assert!(!child.is_mounted());
        assert!(gui.get_by_uid(child.uid()).is_none());
        gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn mounting_twice_is_rejected() {
        let gui = Gui::create();
        let component = gui.mount(ComponentSpec::default()).unwrap();

        assert!(matches!(
            gui.add(component),
            Err(BroadcastError::AlreadyMounted(_))
        ));
    }

    #[test]
    fn adding_a_built_child_moves_it_out_of_its_old_parent() {
        let gui = Gui::create();
        let log = Rc::new(RefCell::new(Vec::new()));
        let tree = GuiFactory::build(
            ComponentSpec::default().with_components(vec![recorder(&log, "moved", WINDOW_SCROLL)]),
        );
        let child = Rc::clone(&tree.children()[0]);

        gui.add(Rc::clone(&child)).unwrap();

        assert!(tree.children().is_empty());
        assert!(Rc::ptr_eq(&child.parent().unwrap(), gui.root()));
        gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();
        assert_eq!(*log.borrow(), ["moved"]);

        gui.remove(child.uid()).unwrap();
        assert!(child.parent().is_none());
        let outcome = gui.broadcast_event(&WINDOW_SCROLL, scroll()).unwrap();
        assert!(outcome.delivered.is_empty());
        assert_eq!(*log.borrow(), ["moved"]);
    }

    #[test]
    fn teardown_rejects_new_work() {
        let gui = Gui::create();
        gui.teardown();
        gui.teardown();

        assert!(gui.is_torn_down());
        assert!(matches!(
            gui.mount(ComponentSpec::default()),
            Err(BroadcastError::TornDown)
        ));
        let window = NativeWindow::new(80, 24);
        assert!(matches!(
            gui.subscribe(&window, "scroll", WINDOW_SCROLL),
            Err(BroadcastError::TornDown)
        ));
    }
}
