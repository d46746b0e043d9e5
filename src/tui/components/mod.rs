//! TUI components using tui-realm.

pub mod charmap;
pub mod help;
pub mod page;

pub use charmap::CharmapDialog;
pub use help::{EVENT_LOG_FOOTER_ACTIONS, MAIN_FOOTER_ACTIONS, format_footer, render_help};
pub use page::Page;
