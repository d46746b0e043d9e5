//! Broadcast event identifiers.
//!
//! System events are the ones a UI root forwards from native (window-level)
//! sources. Applications may define their own ids with [`EventId::new`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an internal broadcast event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Cow<'static, str>);

impl EventId {
    /// Create an id from a static string. Usable in `const` position.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create an id from any string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// The window (terminal viewport) scrolled.
pub const WINDOW_SCROLL: EventId = EventId::from_static("system.window.scroll");

/// The window (terminal viewport) changed size.
pub const WINDOW_RESIZE: EventId = EventId::from_static("system.window.resize");

/// Every open popup should close.
pub const DISMISS_POPUPS: EventId = EventId::from_static("system.dismiss.popups");

/// Native event type that maps onto [`WINDOW_SCROLL`].
pub const NATIVE_SCROLL: &str = "scroll";

/// Native event type that maps onto [`WINDOW_RESIZE`].
pub const NATIVE_RESIZE: &str = "resize";

/// Native event type that maps onto [`DISMISS_POPUPS`].
pub const NATIVE_DISMISS: &str = "dismiss";

/// The system broadcast id for a native event type, if there is one.
pub fn system_event_for(native_type: &str) -> Option<EventId> {
    match native_type {
        NATIVE_SCROLL => Some(WINDOW_SCROLL),
        NATIVE_RESIZE => Some(WINDOW_RESIZE),
        NATIVE_DISMISS => Some(DISMISS_POPUPS),
        _ => None,
    }
}
