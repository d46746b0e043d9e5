//! Interactive TUI: a scrollable page whose terminal events are broadcast to
//! a component tree.
//!
//! Architecture: Activity-based with tui-realm for components.
//! Each screen (activity) has its own Application instance and message types.
//! Terminal scroll, resize and Esc are fed to a `NativeWindow`; the UI root's
//! subscriptions turn them into broadcasts.

mod activities;
mod activity;
mod components;
mod model;

use std::io::stdout;
use std::sync::LazyLock;

use color_eyre::eyre::Result;
use crossterm_actions::{
    ActionBinding, ActionConfig, AppEvent, EditingMode, TuiEvent, TuiRealmDispatcher,
    defaults, keys,
};
use ratatui::{
    Terminal,
    crossterm::ExecutableCommand,
    crossterm::event::{DisableMouseCapture, EnableMouseCapture},
    crossterm::terminal::{
        self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
    prelude::CrosstermBackend,
};

use crate::config::TuicastConfig;

pub use model::Model;

use activities::Msg;
use activity::{ActivityManager, Context};

// ============================================================================
// Event handling (shared across activities)
// ============================================================================

/// Unified application events - wraps TuiEvent + custom actions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AppAction {
    /// Standard TUI events (navigation, input, selection, app)
    Tui(TuiEvent),
    /// Open the special character picker
    OpenCharmap,
    /// Switch to the event log screen
    EventLog,
    /// Scroll down half a page
    HalfPageDown,
    /// Scroll up half a page
    HalfPageUp,
    /// Scroll to the top of the page
    ScrollTop,
    /// Scroll to the bottom of the page
    ScrollBottom,
}

/// Single-key bindings for the actions this application adds.
const CUSTOM_BINDINGS: &[(AppAction, char, &str)] = &[
    (AppAction::OpenCharmap, 'o', "Special characters"),
    (AppAction::EventLog, 'l', "Event log"),
    (AppAction::HalfPageDown, 'd', "Half page down"),
    (AppAction::HalfPageUp, 'u', "Half page up"),
    (AppAction::ScrollTop, 'g', "Top of page"),
    (AppAction::ScrollBottom, 'b', "Bottom of page"),
];

/// Global dispatcher instance - shared by all components.
pub static DISPATCHER: LazyLock<TuiRealmDispatcher<AppAction>> = LazyLock::new(|| {
    let mut config = ActionConfig::new(EditingMode::Emacs);

    // Import all standard TuiEvent bindings wrapped in AppAction::Tui
    for binding in defaults::emacs_defaults().bindings() {
        config.bind(ActionBinding {
            action: AppAction::Tui(binding.action),
            keys: binding.keys.clone(),
            description: binding.description.clone(),
        });
    }

    for (app_action, key, description) in CUSTOM_BINDINGS {
        config.bind(
            ActionBinding::builder()
                .action(app_action.clone())
                .key(keys::char(*key))
                .description(*description)
                .build(),
        );
    }

    config.compile();
    TuiRealmDispatcher::new(config)
});

/// Convenience function for components to access the dispatcher.
pub fn dispatcher() -> &'static TuiRealmDispatcher<AppAction> {
    &DISPATCHER
}

/// Handle global application events that are common across all components.
/// Returns Some(Msg) if the action was handled, None otherwise.
pub fn handle_global_app_events(action: &AppAction) -> Option<Msg> {
    match action {
        AppAction::Tui(TuiEvent::App(AppEvent::Quit)) => Some(Msg::Quit),
        AppAction::Tui(TuiEvent::App(AppEvent::Help)) => Some(Msg::ShowHelp),
        AppAction::EventLog => Some(Msg::SwitchToEventLog),
        _ => None,
    }
}

// ============================================================================
// TUI entry point
// ============================================================================

/// Run the interactive TUI using activity-based architecture.
///
/// The UI root is built before the terminal is switched over, so a failed
/// mount leaves the terminal untouched.
pub fn run(config: &TuicastConfig) -> Result<()> {
    let (width, height) = terminal::size()?;
    let model = Model::new(config, width, height)?;
    let mut manager = ActivityManager::new(Context { model });

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(Into::into)
        .and_then(|mut terminal| manager.run(&mut terminal));
    let restored = restore_terminal();

    result.and(restored)
}

fn restore_terminal() -> Result<()> {
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
