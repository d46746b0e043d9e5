//! Activity modules for the TUI.

pub mod event_log;
pub mod main;

pub use event_log::EventLogActivity;
pub use main::MainActivity;
pub use main::Msg;
