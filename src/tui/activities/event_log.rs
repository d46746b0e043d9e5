//! Event log activity - lists the broadcasts the UI root has delivered.

use std::cell::RefCell;
use std::io::Stdout;
use std::rc::Rc;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use crossterm_actions::{NavigationEvent, TuiEvent};
use ratatui::{
    Terminal,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use tuirealm::{
    Application, Component, Event, EventListenerCfg, MockComponent, PollStrategy, State,
    StateValue,
    command::{Cmd, CmdResult, Direction as CmdDirection},
    props::{AttrValue, Attribute, Props},
};

use crate::native::RawEvent;
use crate::tui::activity::{Activity, Context, ExitReason};
use crate::tui::components::{EVENT_LOG_FOOTER_ACTIONS, format_footer};
use crate::tui::model::{EventLog, LogEntry};
use crate::tui::{AppAction, dispatcher, handle_global_app_events};

// ============================================================================
// Component identifiers (scoped to EventLogActivity)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id {
    LogView,
}

// ============================================================================
// Messages (scoped to EventLogActivity)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
}

// ============================================================================
// User events (required by tui-realm)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {}

// ============================================================================
// LogView Component
// ============================================================================

/// One-line description of a native event.
fn describe(native: &RawEvent) -> String {
    match native {
        RawEvent::Scroll { x, y } => format!("scroll to ({x}, {y})"),
        RawEvent::Resize { width, height } => format!("resize to {width}x{height}"),
        RawEvent::Dismiss => "dismiss".to_string(),
        RawEvent::Custom { name } => format!("custom '{name}'"),
    }
}

fn entry_line(entry: &LogEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:5} ", entry.seq),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<24}", entry.event.as_str()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(describe(&entry.native)),
    ])
}

/// Newest-first list of logged broadcasts.
pub struct LogView {
    props: Props,
    log: Rc<RefCell<EventLog>>,
    scroll: usize,
    visible_height: usize,
}

impl LogView {
    pub fn new(log: Rc<RefCell<EventLog>>) -> Self {
        Self {
            props: Props::default(),
            log,
            scroll: 0,
            visible_height: 20,
        }
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        let max_scroll = self.log.borrow().len().saturating_sub(self.visible_height);
        self.scroll = (self.scroll + 1).min(max_scroll);
    }
}

impl MockComponent for LogView {
    fn view(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let block = Block::default().title(" Broadcasts ").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.visible_height = inner.height as usize;

        let log = self.log.borrow();
        if log.is_empty() {
            let empty = Paragraph::new("No broadcasts yet. Scroll, resize, or press Esc.")
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC));
            frame.render_widget(empty, inner);
            return;
        }

        let lines: Vec<Line> = log
            .entries()
            .rev()
            .skip(self.scroll)
            .take(self.visible_height)
            .map(entry_line)
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if log.len() > self.visible_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state = ScrollbarState::new(log.len()).position(self.scroll);
            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::Usize(self.scroll))
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        match cmd {
            Cmd::Scroll(CmdDirection::Up) => {
                self.scroll_up();
                CmdResult::Changed(self.state())
            }
            Cmd::Scroll(CmdDirection::Down) => {
                self.scroll_down();
                CmdResult::Changed(self.state())
            }
            _ => CmdResult::None,
        }
    }
}

impl Component<Msg, UserEvent> for LogView {
    fn on(&mut self, ev: Event<UserEvent>) -> Option<Msg> {
        let Event::Keyboard(key_event) = ev else {
            return None;
        };

        if key_event.code == tuirealm::event::Key::Esc {
            return Some(Msg::Back);
        }

        let action = dispatcher().dispatch(&key_event)?;

        if let Some(msg) = handle_global_app_events(&action) {
            return match msg {
                crate::tui::activities::Msg::Quit => Some(Msg::Quit),
                crate::tui::activities::Msg::SwitchToEventLog => Some(Msg::Back), // Toggle back
                _ => None,
            };
        }

        match action {
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up)) => {
                self.perform(Cmd::Scroll(CmdDirection::Up));
                Some(Msg::ScrollUp)
            }
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down)) => {
                self.perform(Cmd::Scroll(CmdDirection::Down));
                Some(Msg::ScrollDown)
            }
            _ => None,
        }
    }
}

// ============================================================================
// EventLogActivity
// ============================================================================

#[derive(Default)]
pub struct EventLogActivity {
    app: Option<Application<Id, Msg, UserEvent>>,
    context: Option<Context>,
    exit_reason: Option<ExitReason>,
}

impl EventLogActivity {
    fn create_application() -> Application<Id, Msg, UserEvent> {
        Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(Duration::from_millis(20), 10)
                .poll_timeout(Duration::from_millis(50)),
        )
    }
}

impl Activity for EventLogActivity {
    fn on_create(&mut self, context: Context) {
        let mut app = Self::create_application();
        let log_view = LogView::new(Rc::clone(&context.model.log));
        let _ = app.mount(Id::LogView, Box::new(log_view), vec![]);
        let _ = app.active(&Id::LogView);

        self.context = Some(context);
        self.app = Some(app);
    }

    fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let app = self
            .app
            .as_mut()
            .ok_or_else(|| eyre!("event log drawn before creation"))?;
        let delivered = self
            .context
            .as_ref()
            .map(|ctx| ctx.model.log.borrow().len())
            .unwrap_or(0);

        terminal.draw(|frame| {
            let area = frame.area();

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Title
                    Constraint::Min(5),    // Log
                    Constraint::Length(1), // Status
                ])
                .split(area);

            let title = format!(" Event Log - {delivered} broadcasts ");
            let title_widget =
                Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title_widget, rows[0]);

            app.view(&Id::LogView, frame, rows[1]);

            let status = format_footer(EVENT_LOG_FOOTER_ACTIONS, &[("back", "Esc")]);
            let status_widget =
                Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(status_widget, rows[2]);
        })?;

        if let Ok(messages) = app.tick(PollStrategy::Once) {
            for msg in messages {
                match msg {
                    Msg::Quit => {
                        self.exit_reason = Some(ExitReason::Quit);
                        return Ok(());
                    }
                    Msg::Back => {
                        self.exit_reason = Some(ExitReason::SwitchToMain);
                        return Ok(());
                    }
                    Msg::ScrollUp | Msg::ScrollDown => {
                        // Already handled in component
                    }
                }
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_events_are_described() {
        assert_eq!(describe(&RawEvent::Scroll { x: 0, y: 12 }), "scroll to (0, 12)");
        assert_eq!(
            describe(&RawEvent::Resize {
                width: 80,
                height: 24
            }),
            "resize to 80x24"
        );
        assert_eq!(describe(&RawEvent::Dismiss), "dismiss");
    }
}
