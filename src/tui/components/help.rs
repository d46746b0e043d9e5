//! Help modal component displaying keybindings.

use crossterm_actions::{AppEvent, NavigationEvent, TuiEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::{AppAction, dispatcher};

/// Actions to display in a keybinding group.
struct KeybindingGroup {
    title: &'static str,
    actions: &'static [AppAction],
}

/// Groups of actions for the help modal, with semantic organization.
const HELP_GROUPS: &[KeybindingGroup] = &[
    KeybindingGroup {
        title: "Global",
        actions: &[
            AppAction::Tui(TuiEvent::App(AppEvent::Quit)),
            AppAction::Tui(TuiEvent::App(AppEvent::Help)),
        ],
    },
    KeybindingGroup {
        title: "Views",
        actions: &[AppAction::EventLog, AppAction::OpenCharmap],
    },
    KeybindingGroup {
        title: "Page",
        actions: &[
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up)),
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down)),
            AppAction::HalfPageUp,
            AppAction::HalfPageDown,
            AppAction::ScrollTop,
            AppAction::ScrollBottom,
        ],
    },
];

/// Extra keybindings not in dispatcher (component-specific behaviors).
/// Format: (description, keys)
const EXTRA_BINDINGS: &[(&str, &str)] = &[
    ("Scroll page", "Mouse wheel"),
    ("Dismiss popups", "Esc"),
    ("Search characters", "type"),
    ("Next category", "Tab"),
    ("Insert character", "Enter"),
];

/// Actions shown in the main activity footer.
pub const MAIN_FOOTER_ACTIONS: &[AppAction] = &[
    AppAction::OpenCharmap,
    AppAction::EventLog,
    AppAction::Tui(TuiEvent::App(AppEvent::Help)),
    AppAction::Tui(TuiEvent::App(AppEvent::Quit)),
];

/// Actions shown in the event log footer.
pub const EVENT_LOG_FOOTER_ACTIONS: &[AppAction] = &[
    AppAction::EventLog,
    AppAction::Tui(TuiEvent::App(AppEvent::Quit)),
];

/// Footer text: `desc: key` for each bound action, then the extras.
pub fn format_footer(actions: &[AppAction], extras: &[(&str, &str)]) -> String {
    let help_entries = dispatcher().config().help_entries();
    let bound = actions.iter().filter_map(|action| {
        let entry = help_entries.get(action)?;
        let key = entry.keys.first()?;
        let desc = entry.description?;
        let word = desc.split_whitespace().next().unwrap_or(desc);
        Some(format!("{}: {key}", word.to_lowercase()))
    });
    let extra = extras.iter().map(|(desc, key)| format!("{desc}: {key}"));

    bound.chain(extra).collect::<Vec<_>>().join(" | ")
}

const DESC_WIDTH: usize = 22;

fn binding_line(description: &str, keys: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {description:<DESC_WIDTH$}")),
        Span::styled(keys, Style::default().fg(Color::Gray)),
    ])
}

/// Body of the help modal: bound actions by group, then the fixed bindings.
fn help_lines() -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_entries = dispatcher().config().help_entries();
    let mut lines = Vec::new();

    for group in HELP_GROUPS {
        lines.push(Line::styled(group.title, bold));
        lines.extend(group.actions.iter().filter_map(|action| {
            let entry = help_entries.get(action)?;
            let keys = entry
                .keys
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Some(binding_line(entry.description.unwrap_or("-"), keys))
        }));
        lines.push(Line::default());
    }

    lines.push(Line::styled("Events", bold));
    lines.extend(
        EXTRA_BINDINGS
            .iter()
            .map(|(description, keys)| binding_line(description, keys.to_string())),
    );
    lines
}

/// Render the help modal, sized to its content and centered.
pub fn render_help(frame: &mut Frame) {
    let lines = help_lines();
    let width = lines.iter().map(Line::width).max().unwrap_or(0) + 4;
    let width = u16::try_from(width).unwrap_or(u16::MAX);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);

    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_bottom(Line::from(" Esc, ? or Enter to close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
