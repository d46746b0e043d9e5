//! Broadcast native window events to a tree of UI components.
//!
//! A [`Gui`] owns a component tree. Components declare the events they handle
//! in an immutable [`EventHandlers`] table. The root's dispatcher listens on a
//! [`NativeWindow`] and turns native events into [`Gui::broadcast_event`]
//! passes that visit every mounted, interested component in tree order.

pub mod charmap;
pub mod cli;
pub mod component;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod gui;
pub mod handlers;
pub mod logging;
pub mod native;
pub mod registry;
pub mod replay;
pub mod simulated;
pub mod testing;
pub mod tui;

pub use component::{Component, ComponentSpec, Dom, GuiFactory, Uid};
pub use dispatcher::{Disposer, RootDispatcher};
pub use error::BroadcastError;
pub use events::EventId;
pub use gui::{BroadcastOutcome, Gui};
pub use handlers::{EventHandlers, Handler, HandlerEntry, run};
pub use native::{NativeWindow, RawEvent};
pub use registry::EventRegistry;
pub use simulated::SimulatedEvent;
