//! Special character picker popup.
//!
//! Layout and filtering live in [`CharmapState`], shared with the UI root's
//! resize and dismiss handlers. This component only draws that state and
//! turns keys into messages.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};
use tuirealm::{
    Component, Event, MockComponent, State, StateValue,
    command::{Cmd, CmdResult},
    event::{Key, KeyModifiers},
    props::{AttrValue, Attribute, Props},
};

use crate::charmap::{CELL_WIDTH, CharmapState, tab_titles};
use crate::tui::activities::main::{Msg, UserEvent};
use crate::tui::model::dialog_width;

/// Centered area of the dialog within a frame.
pub fn dialog_area(area: Rect, width: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub struct CharmapDialog {
    props: Props,
    state: Rc<RefCell<CharmapState>>,
}

impl CharmapDialog {
    pub fn new(state: Rc<RefCell<CharmapState>>) -> Self {
        Self {
            props: Props::default(),
            state,
        }
    }

    fn grid_lines(state: &CharmapState) -> Vec<Line<'static>> {
        let visible = state.visible();
        if visible.is_empty() {
            return vec![Line::from(Span::styled(
                "No matching characters",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ))];
        }

        let selected = Style::default().fg(Color::Black).bg(Color::Cyan);
        visible
            .chunks(usize::from(state.columns))
            .enumerate()
            .map(|(row, chunk)| {
                let spans: Vec<Span> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, entry)| {
                        let idx = row * usize::from(state.columns) + col;
                        let cell =
                            format!(" {:<width$}", entry.ch, width = usize::from(CELL_WIDTH - 1));
                        if idx == state.selected {
                            Span::styled(cell, selected)
                        } else {
                            Span::raw(cell)
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl MockComponent for CharmapDialog {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let state = self.state.borrow();
        if !state.open {
            return;
        }

        let area = dialog_area(area, dialog_width(area.width), state.dialog_height());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Special characters ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search_area, tabs_area, panel_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(state.panel_height),
            Constraint::Length(1),
        ])
        .areas(inner);

        let search = Line::from(vec![
            Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(state.query.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]);
        frame.render_widget(Paragraph::new(search), search_area);

        let tabs = Tabs::new(tab_titles())
            .select(state.tab)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_widget(tabs, tabs_area);

        frame.render_widget(Paragraph::new(Self::grid_lines(&state)), panel_area);

        let name = state
            .visible()
            .get(state.selected)
            .map(|e| e.name)
            .unwrap_or("");
        let footer = Paragraph::new(Line::from(vec![
            Span::raw(name.to_string()),
            Span::styled(
                "  Enter: insert | Tab: category | Esc: close",
                Style::default().fg(Color::Gray),
            ),
        ]));
        frame.render_widget(footer, footer_area);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::Usize(self.state.borrow().selected))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, UserEvent> for CharmapDialog {
    fn on(&mut self, ev: Event<UserEvent>) -> Option<Msg> {
        let key_event = match ev {
            Event::WindowResize(width, height) => {
                return Some(Msg::TerminalResized(width, height));
            }
            Event::Keyboard(key_event) => key_event,
            _ => return None,
        };

        let columns = isize::try_from(self.state.borrow().columns).unwrap_or(1);
        match key_event.code {
            Key::Esc => Some(Msg::DismissPopups),
            Key::Enter => Some(Msg::CharmapPick),
            Key::Tab => Some(Msg::CharmapNextTab),
            Key::BackTab => Some(Msg::CharmapPrevTab),
            Key::Left => Some(Msg::CharmapMove(-1)),
            Key::Right => Some(Msg::CharmapMove(1)),
            Key::Up => Some(Msg::CharmapMove(-columns)),
            Key::Down => Some(Msg::CharmapMove(columns)),
            Key::Backspace => {
                let mut query = self.state.borrow().query.clone();
                query.pop();
                Some(Msg::CharmapQuery(query))
            }
            Key::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut query = self.state.borrow().query.clone();
                query.push(c);
                Some(Msg::CharmapQuery(query))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_is_centered_and_clipped_to_the_screen() {
        let screen = Rect::new(0, 0, 80, 10);

        let area = dialog_area(screen, 40, 20);

        assert_eq!((area.width, area.height), (40, 10));
        assert_eq!(area.x, 20);
        assert_eq!(area.y, 0);
    }

    #[test]
    fn dialog_height_ignores_the_query() {
        let state = Rc::new(RefCell::new(CharmapState::new(60)));
        let screen = Rect::new(0, 0, 100, 40);
        let before = dialog_area(screen, 60, state.borrow().dialog_height());

        state.borrow_mut().set_query("nothing matches this");
        let after = dialog_area(screen, 60, state.borrow().dialog_height());

        assert_eq!(before, after);
    }
}
