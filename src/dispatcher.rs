//! Root dispatcher: one native listener per window and external event type.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use color_eyre::eyre::Result;
use tracing::{debug, info};

use crate::error::BroadcastError;
use crate::events::EventId;
use crate::gui::Gui;
use crate::native::{ListenerId, NativeWindow, RawEvent};

struct SubscriptionState {
    event_type: String,
    internal: EventId,
    window: Weak<NativeWindow>,
    listener: Cell<Option<ListenerId>>,
}

/// Releases a native subscription.
///
/// Clones share the subscription: the first `dispose` detaches the listener
/// and every later call, from any clone, is a no-op. Dropping a disposer does
/// not detach anything; the owning root releases what is left on teardown.
#[derive(Clone)]
pub struct Disposer {
    state: Rc<SubscriptionState>,
}

impl Disposer {
    /// Detach the native listener. Returns true only for the call that did it.
    pub fn dispose(&self) -> bool {
        let Some(id) = self.state.listener.take() else {
            return false;
        };
        if let Some(window) = self.state.window.upgrade() {
            window.unbind(id);
        }
        info!(event_type = %self.state.event_type, "native subscription disposed");
        true
    }

    pub fn is_active(&self) -> bool {
        self.state.listener.get().is_some()
    }

    pub fn event_type(&self) -> &str {
        &self.state.event_type
    }

    fn is_bound_to(&self, window: &Rc<NativeWindow>) -> bool {
        self.state
            .window
            .upgrade()
            .is_some_and(|bound| Rc::ptr_eq(&bound, window))
    }

    /// Internal event the native events are broadcast as.
    pub fn internal(&self) -> &EventId {
        &self.state.internal
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
            .field("event_type", &self.state.event_type)
            .field("internal", &self.state.internal)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Windows are told apart by address. An entry only counts for a window
/// while its listener is live and its weak handle still points there.
type SubscriptionKey = (usize, String);

fn key_for(window: &Rc<NativeWindow>, external_type: &str) -> SubscriptionKey {
    (Rc::as_ptr(window) as usize, external_type.to_string())
}

/// Bridges native event sources to a root's broadcast.
#[derive(Default)]
pub struct RootDispatcher {
    subscriptions: RefCell<BTreeMap<SubscriptionKey, Disposer>>,
}

impl RootDispatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Forward `external_type` events from `window` as `internal` broadcasts.
    ///
    /// Idempotent per window and external type: while a subscription is
    /// active, a repeat call with the same internal event attaches nothing and
    /// returns a disposer for the existing one. A repeat call naming a
    /// different internal event is rejected.
    pub(crate) fn subscribe(
        &self,
        gui: Weak<Gui>,
        window: &Rc<NativeWindow>,
        external_type: &str,
        internal: EventId,
    ) -> Result<Disposer, BroadcastError> {
        let key = key_for(window, external_type);
        if let Some(existing) = self.subscriptions.borrow().get(&key)
            && existing.is_active()
            && existing.is_bound_to(window)
        {
            if *existing.internal() != internal {
                return Err(BroadcastError::ConflictingSubscription {
                    external_type: external_type.to_string(),
                    existing: existing.internal().clone(),
                    requested: internal,
                });
            }
            debug!(external_type, "already subscribed, reusing native listener");
            return Ok(existing.clone());
        }

        let forward = internal.clone();
        let listener_id = window.bind(
            external_type,
            Rc::new(move |raw: &RawEvent| -> Result<()> {
                let Some(gui) = gui.upgrade() else {
                    return Ok(());
                };
                gui.broadcast_event(&forward, raw.clone())?;
                Ok(())
            }),
        );

        let disposer = Disposer {
            state: Rc::new(SubscriptionState {
                event_type: external_type.to_string(),
                internal: internal.clone(),
                window: Rc::downgrade(window),
                listener: Cell::new(Some(listener_id)),
            }),
        };
        self.subscriptions.borrow_mut().insert(key, disposer.clone());
        info!(external_type, internal = %internal, "native subscription attached");
        Ok(disposer)
    }

    /// Release every window's subscription for one external type.
    pub fn unsubscribe(&self, external_type: &str) -> bool {
        let removed: Vec<Disposer> = {
            let mut subscriptions = self.subscriptions.borrow_mut();
            let keys: Vec<SubscriptionKey> = subscriptions
                .keys()
                .filter(|(_, t)| t == external_type)
                .cloned()
                .collect();
            keys.iter().filter_map(|k| subscriptions.remove(k)).collect()
        };
        removed.iter().filter(|d| d.dispose()).count() > 0
    }

    /// Release every subscription. Returns how many listeners were detached.
    pub fn unsubscribe_all(&self) -> usize {
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        subscriptions.values().filter(|d| d.dispose()).count()
    }

    /// Whether any window has an active subscription for `external_type`.
    pub fn is_subscribed(&self, external_type: &str) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|((_, t), d)| t == external_type && d.is_active())
    }

    /// External types with an active subscription, sorted and deduplicated.
    pub fn subscribed_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|(_, d)| d.is_active())
            .map(|((_, t), _)| t.clone())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    /// Number of active native listeners across all windows.
    pub fn active_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|d| d.is_active())
            .count()
    }
}
