//! Scrollable page component.
//!
//! The page does not own its scroll offset. It reads the offset from the
//! native window when drawing and asks for scrolling through messages, so
//! every scroll reaches the window and from there the UI root's subscribers.

use std::rc::Rc;

use crossterm_actions::{NavigationEvent, TuiEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use tuirealm::{
    Component, Event, MockComponent, State, StateValue,
    command::{Cmd, CmdResult},
    event::{Key, MouseEventKind},
    props::{AttrValue, Attribute, Props},
};

use crate::native::NativeWindow;
use crate::tui::activities::main::{Msg, UserEvent};
use crate::tui::{AppAction, dispatcher, handle_global_app_events};

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: i32 = 3;

const WORDS: &[&str] = &[
    "broadcast", "handler", "window", "scroll", "resize", "dismiss", "component", "root",
    "listener", "registry", "mounted", "event", "tree", "order", "popup", "banner",
];

/// Filler text for one page row.
fn row_text(row: usize) -> String {
    (0..6)
        .map(|i| WORDS[(row * 7 + i * 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct Page {
    props: Props,
    window: Rc<NativeWindow>,
}

impl Page {
    pub fn new(window: Rc<NativeWindow>) -> Self {
        Self {
            props: Props::default(),
            window,
        }
    }
}

impl MockComponent for Page {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" Page ").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let total = usize::try_from(self.window.content_height()).unwrap_or(usize::MAX);
        let offset = usize::try_from(self.window.scroll_offset().1).unwrap_or(0);
        let gutter = Style::default().fg(Color::DarkGray);

        let lines: Vec<Line> = (offset..total)
            .take(usize::from(inner.height))
            .map(|row| {
                Line::from(vec![
                    Span::styled(format!("{:5} ", row + 1), gutter),
                    Span::raw(row_text(row)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if total > usize::from(inner.height) {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state = ScrollbarState::new(total).position(offset);
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
        let offset = usize::try_from(self.window.scroll_offset().1).unwrap_or(0);
        State::One(StateValue::Usize(offset))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, UserEvent> for Page {
    fn on(&mut self, ev: Event<UserEvent>) -> Option<Msg> {
        let key_event = match ev {
            Event::WindowResize(width, height) => {
                return Some(Msg::TerminalResized(width, height));
            }
            Event::Mouse(mouse) => {
                return match mouse.kind {
                    MouseEventKind::ScrollDown => Some(Msg::ScrollBy(WHEEL_STEP)),
                    MouseEventKind::ScrollUp => Some(Msg::ScrollBy(-WHEEL_STEP)),
                    _ => None,
                };
            }
            Event::Keyboard(key_event) => key_event,
            _ => return None,
        };

        // Esc is the dismiss gesture, not mapped in dispatcher
        if key_event.code == Key::Esc {
            return Some(Msg::DismissPopups);
        }

        let action = dispatcher().dispatch(&key_event)?;

        if let Some(msg) = handle_global_app_events(&action) {
            return Some(msg);
        }

        match action {
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up)) => Some(Msg::ScrollBy(-1)),
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down)) => Some(Msg::ScrollBy(1)),
            AppAction::HalfPageUp => Some(Msg::HalfPageUp),
            AppAction::HalfPageDown => Some(Msg::HalfPageDown),
            AppAction::ScrollTop => Some(Msg::ScrollTop),
            AppAction::ScrollBottom => Some(Msg::ScrollBottom),
            AppAction::OpenCharmap => Some(Msg::OpenCharmap),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_have_stable_text() {
        assert_eq!(row_text(3), row_text(3));
        assert_ne!(row_text(0), row_text(1));
    }
}
