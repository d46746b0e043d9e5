//! Main activity - the scrollable page with its banner and popups.

use std::io::Stdout;
use std::rc::Rc;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use ratatui::{
    Terminal,
    crossterm::event::{self, Event, KeyCode},
    layout::{Constraint, Direction, Layout},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};
use tuirealm::{
    Application, EventListenerCfg, PollStrategy, Sub, SubClause, SubEventClause, Update,
};

use crate::tui::Model;
use crate::tui::activity::{Activity, Context, ExitReason};
use crate::tui::components::{
    CharmapDialog, MAIN_FOOTER_ACTIONS, Page, format_footer, render_help,
};

// ============================================================================
// Component identifiers (scoped to MainActivity)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id {
    Page,
    Charmap,
}

// ============================================================================
// Messages (scoped to MainActivity)
// ============================================================================

/// All possible messages that can be sent in MainActivity.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // Application control
    Quit,
    ShowHelp,
    HideHelp,

    // Page scrolling (fed to the native window)
    ScrollBy(i32),
    HalfPageDown,
    HalfPageUp,
    ScrollTop,
    ScrollBottom,

    // Terminal size changed (fed to the native window)
    TerminalResized(u16, u16),

    // Special character dialog
    OpenCharmap,
    DismissPopups,
    CharmapQuery(String),
    CharmapNextTab,
    CharmapPrevTab,
    CharmapMove(isize),
    CharmapPick,

    // Activity transition
    SwitchToEventLog,
}

// ============================================================================
// User events (required by tui-realm, currently unused)
// ============================================================================

/// Custom user events (currently unused, but required by tui-realm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {}

// ============================================================================
// MainActivity
// ============================================================================

#[derive(Default)]
pub struct MainActivity {
    app: Option<Application<Id, Msg, UserEvent>>,
    context: Option<Context>,
    exit_reason: Option<ExitReason>,
}

impl MainActivity {
    /// Create and configure the tui-realm application.
    fn create_application() -> Application<Id, Msg, UserEvent> {
        Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(Duration::from_millis(20), 10)
                .poll_timeout(Duration::from_millis(50)),
        )
    }

    /// Both components hear terminal resizes, whichever one has focus.
    fn resize_subscription() -> Vec<Sub<Id, UserEvent>> {
        vec![Sub::new(SubEventClause::WindowResize, SubClause::Always)]
    }

    fn mount_components(app: &mut Application<Id, Msg, UserEvent>, model: &Model) -> Result<()> {
        app.mount(
            Id::Page,
            Box::new(Page::new(Rc::clone(&model.window))),
            Self::resize_subscription(),
        )?;
        app.mount(
            Id::Charmap,
            Box::new(CharmapDialog::new(Rc::clone(&model.charmap))),
            Self::resize_subscription(),
        )?;
        app.active(&Id::Page)?;
        Ok(())
    }

    /// Give the dialog focus while it is open, the page otherwise.
    fn sync_focus(app: &mut Application<Id, Msg, UserEvent>, model: &Model) {
        let wanted = if model.charmap_open() {
            Id::Charmap
        } else {
            Id::Page
        };
        if app.focus() != Some(&wanted) {
            let _ = app.active(&wanted);
        }
    }
}

impl Activity for MainActivity {
    fn on_create(&mut self, context: Context) {
        let mut app = Self::create_application();
        if let Err(e) = Self::mount_components(&mut app, &context.model) {
            tracing::error!("Failed to mount components: {}", e);
        }
        self.context = Some(context);
        self.app = Some(app);
    }

    fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let app = self
            .app
            .as_mut()
            .ok_or_else(|| eyre!("main activity drawn before creation"))?;
        let model = &mut self
            .context
            .as_mut()
            .ok_or_else(|| eyre!("main activity has no context"))?
            .model;

        terminal.draw(|frame| {
            let area = frame.area();

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Title
                    Constraint::Length(1), // Banner
                    Constraint::Min(3),    // Page
                    Constraint::Length(1), // Status
                ])
                .split(area);

            let title = if model.picked.is_empty() {
                " tuicast ".to_string()
            } else {
                format!(" tuicast - picked: {} ", model.picked)
            };
            let title_widget =
                Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title_widget, rows[0]);

            let banner =
                Paragraph::new(model.banner_text()).style(Style::default().fg(Color::Cyan));
            frame.render_widget(banner, rows[1]);

            app.view(&Id::Page, frame, rows[2]);
            app.view(&Id::Charmap, frame, area);

            let status = model
                .message
                .clone()
                .unwrap_or_else(|| format_footer(MAIN_FOOTER_ACTIONS, &[("dismiss", "Esc")]));
            let status_widget =
                Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(status_widget, rows[3]);

            if model.show_help {
                render_help(frame);
            }
        })?;

        // Help modal intercepts all input when visible
        if model.show_help {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                        model.update(Some(Msg::HideHelp));
                    }
                    _ => {}
                }
            }
            return Ok(());
        }

        if let Ok(messages) = app.tick(PollStrategy::Once) {
            for msg in messages {
                match msg {
                    Msg::Quit => {
                        self.exit_reason = Some(ExitReason::Quit);
                        return Ok(());
                    }
                    Msg::SwitchToEventLog => {
                        self.exit_reason = Some(ExitReason::SwitchToEventLog);
                        return Ok(());
                    }
                    _ => {}
                }

                if !matches!(msg, Msg::HideHelp | Msg::ShowHelp) {
                    model.message = None;
                }

                // Process through model, handle chained messages
                let mut current = Some(msg);
                while let Some(m) = current {
                    current = model.update(Some(m));
                }
            }
            Self::sync_focus(app, model);
        }

        Ok(())
    }

    fn will_umount(&self) -> Option<&ExitReason> {
        self.exit_reason.as_ref()
    }

    fn on_destroy(&mut self) -> Option<Context> {
        self.app = None;
        self.context.take()
    }
}
