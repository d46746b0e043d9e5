//! Native event source: the window a UI root listens on.
//!
//! `NativeWindow` is an in-process event target. Front-ends feed it the events
//! their platform produces (the terminal, in the bundled TUI), and roots attach
//! listeners to it through their dispatcher.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::events::{NATIVE_DISMISS, NATIVE_RESIZE, NATIVE_SCROLL};

/// A raw event as produced by the native platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawEvent {
    Scroll { x: i32, y: i32 },
    Resize { width: u16, height: u16 },
    Dismiss,
    Custom { name: String },
}

impl RawEvent {
    /// Native event type name, used as the listener key.
    pub fn event_type(&self) -> &str {
        match self {
            Self::Scroll { .. } => NATIVE_SCROLL,
            Self::Resize { .. } => NATIVE_RESIZE,
            Self::Dismiss => NATIVE_DISMISS,
            Self::Custom { name } => name,
        }
    }
}

/// Callback attached to a native event type.
pub type NativeListener = Rc<dyn Fn(&RawEvent) -> Result<()>>;

/// Handle identifying one attached native listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Binding {
    id: ListenerId,
    event_type: String,
    listener: NativeListener,
}

/// Window-level native event target with a scrollable viewport.
pub struct NativeWindow {
    bindings: RefCell<Vec<Binding>>,
    next_id: Cell<u64>,
    scroll: Cell<(i32, i32)>,
    size: Cell<(u16, u16)>,
    content_height: Cell<u32>,
}

impl NativeWindow {
    /// Create a window with the given viewport size and no scrollable content.
    pub fn new(width: u16, height: u16) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            scroll: Cell::new((0, 0)),
            size: Cell::new((width, height)),
            content_height: Cell::new(u32::from(height)),
        })
    }

    /// Attach a listener for a native event type.
    pub fn bind(&self, event_type: &str, listener: NativeListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.bindings.borrow_mut().push(Binding {
            id,
            event_type: event_type.to_string(),
            listener,
        });
        trace!(event_type, "native listener bound");
        id
    }

    /// Detach a listener. Returns false if it was not attached.
    pub fn unbind(&self, id: ListenerId) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        let before = bindings.len();
        bindings.retain(|b| b.id != id);
        before != bindings.len()
    }

    /// Number of listeners attached for an event type.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.bindings
            .borrow()
            .iter()
            .filter(|b| b.event_type == event_type)
            .count()
    }

    fn is_bound(&self, id: ListenerId) -> bool {
        self.bindings.borrow().iter().any(|b| b.id == id)
    }

    /// Deliver an event to every listener of its type, in bind order.
    ///
    /// Listeners detached by an earlier listener in the same delivery are
    /// skipped. The first listener error stops delivery and is returned.
    /// Returns the number of listeners invoked.
    pub fn fire(&self, event: &RawEvent) -> Result<usize> {
        let targets: Vec<(ListenerId, NativeListener)> = self
            .bindings
            .borrow()
            .iter()
            .filter(|b| b.event_type == event.event_type())
            .map(|b| (b.id, Rc::clone(&b.listener)))
            .collect();

        let mut invoked = 0;
        for (id, listener) in targets {
            if !self.is_bound(id) {
                continue;
            }
            listener(event)?;
            invoked += 1;
        }
        Ok(invoked)
    }

    /// Set the total height of the scrollable content.
    ///
    /// Clamps the current offset into the new range without firing.
    pub fn set_content_height(&self, height: u32) {
        self.content_height.set(height);
        let (x, y) = self.scroll.get();
        self.scroll.set((x, y.min(self.max_scroll_y())));
    }

    pub fn content_height(&self) -> u32 {
        self.content_height.get()
    }

    /// Largest vertical offset the content allows.
    pub fn max_scroll_y(&self) -> i32 {
        let viewport = u32::from(self.size.get().1);
        i32::try_from(self.content_height.get().saturating_sub(viewport)).unwrap_or(i32::MAX)
    }

    pub fn scroll_offset(&self) -> (i32, i32) {
        self.scroll.get()
    }

    /// Scroll to an offset, clamped to the content.
    ///
    /// Fires `scroll` only if the offset actually changed; returns whether it
    /// fired.
    pub fn scroll_to(&self, x: i32, y: i32) -> Result<bool> {
        let target = (x.max(0), y.clamp(0, self.max_scroll_y()));
        if target == self.scroll.get() {
            return Ok(false);
        }
        self.scroll.set(target);
        self.fire(&RawEvent::Scroll {
            x: target.0,
            y: target.1,
        })?;
        Ok(true)
    }

    /// Scroll vertically by a delta, clamped to the content.
    pub fn scroll_by(&self, dy: i32) -> Result<bool> {
        let (x, y) = self.scroll.get();
        self.scroll_to(x, y.saturating_add(dy))
    }

    pub fn size(&self) -> (u16, u16) {
        self.size.get()
    }

    /// Change the viewport size. Fires `resize` only if the size changed.
    pub fn resize(&self, width: u16, height: u16) -> Result<bool> {
        if (width, height) == self.size.get() {
            return Ok(false);
        }
        self.size.set((width, height));
        let (x, y) = self.scroll.get();
        self.scroll.set((x, y.min(self.max_scroll_y())));
        self.fire(&RawEvent::Resize { width, height })?;
        Ok(true)
    }
}
