//! Activity-based architecture for the TUI.
//!
//! Each screen in the TUI is an Activity with its own Application instance,
//! component IDs, and message types. The ActivityManager orchestrates transitions.
//! The model travels between activities inside the [`Context`], so the UI root
//! and its native subscriptions live as long as the whole session.

use std::io::Stdout;

use color_eyre::eyre::{Result, eyre};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::debug;

use super::Model;
use super::activities::{EventLogActivity, MainActivity};

/// Shared context passed between activities.
pub struct Context {
    pub model: Model,
}

/// Why an activity asked to be unmounted.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitReason {
    Quit,
    SwitchToMain,
    SwitchToEventLog,
}

impl ExitReason {
    /// Activity to show next, or `None` to leave the TUI.
    fn next(&self) -> Option<ActivityType> {
        match self {
            Self::Quit => None,
            Self::SwitchToMain => Some(ActivityType::Main),
            Self::SwitchToEventLog => Some(ActivityType::EventLog),
        }
    }
}

/// Activity lifecycle trait.
///
/// Each activity owns its own tui-realm Application and handles its own events.
pub trait Activity {
    /// Take ownership of the shared context and mount components.
    fn on_create(&mut self, context: Context);

    /// Draw one frame and process one tick of input.
    fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()>;

    /// `Some` once the activity wants to be replaced.
    fn will_umount(&self) -> Option<&ExitReason>;

    /// Unmount and hand the context back.
    fn on_destroy(&mut self) -> Option<Context>;
}

/// Screens the manager can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Main,
    EventLog,
}

impl ActivityType {
    fn build(self) -> Box<dyn Activity> {
        match self {
            Self::Main => Box::<MainActivity>::default(),
            Self::EventLog => Box::<EventLogActivity>::default(),
        }
    }
}

/// Runs one activity at a time, passing the context along on each switch.
pub struct ActivityManager {
    context: Option<Context>,
    current: ActivityType,
}

impl ActivityManager {
    pub fn new(context: Context) -> Self {
        Self {
            context: Some(context),
            current: ActivityType::Main,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            let context = self
                .context
                .take()
                .ok_or_else(|| eyre!("activity context was not returned"))?;
            let mut activity = self.current.build();
            activity.on_create(context);
            debug!(activity = ?self.current, "activity created");

            let next = loop {
                activity.on_draw(terminal)?;
                if let Some(reason) = activity.will_umount() {
                    break reason.next();
                }
            };

            self.context = activity.on_destroy();
            match next {
                Some(next) => self.current = next,
                None => return Ok(()),
            }
        }
    }
}
