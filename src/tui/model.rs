//! Application model for the TUI.
//!
//! The model owns the native window, the UI root mounted on it, and the
//! state its components share with the tui-realm views. Everything the
//! terminal does to the page goes through the window, so the components
//! only ever learn about it from broadcasts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{error, info};
use tuirealm::Update;

use crate::charmap::CharmapState;
use crate::component::{Component, ComponentSpec, Dom};
use crate::config::TuicastConfig;
use crate::dispatcher::Disposer;
use crate::events::{
    DISMISS_POPUPS, EventId, NATIVE_DISMISS, NATIVE_RESIZE, NATIVE_SCROLL, WINDOW_RESIZE,
    WINDOW_SCROLL,
};
use crate::gui::Gui;
use crate::handlers::{EventHandlers, run};
use crate::native::{NativeWindow, RawEvent};

use super::activities::Msg;

/// Rows of the screen not available to the page (title, banner, status, borders).
pub const PAGE_CHROME: u16 = 5;

/// Broadcasts kept for the event log screen.
const LOG_CAPACITY: usize = 200;

/// One broadcast seen by the event log component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub seq: u64,
    pub event: EventId,
    pub native: RawEvent,
}

/// Recent broadcasts, oldest first.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    next_seq: u64,
}

impl EventLog {
    fn push(&mut self, event: EventId, native: RawEvent) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.next_seq += 1;
        self.entries.push_back(LogEntry {
            seq: self.next_seq,
            event,
            native,
        });
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outer width of the special character dialog for a terminal width.
pub fn dialog_width(terminal_width: u16) -> u16 {
    (terminal_width.saturating_mul(3) / 5)
        .clamp(24, 72)
        .min(terminal_width)
}

/// Application model containing all state.
pub struct Model {
    pub window: Rc<NativeWindow>,
    pub gui: Rc<Gui>,
    pub banner: Rc<Component>,
    pub charmap: Rc<RefCell<CharmapState>>,
    pub log: Rc<RefCell<EventLog>>,
    disposers: Vec<Disposer>,

    /// Characters picked from the dialog
    pub picked: String,

    // UI state
    pub quit: bool,
    pub show_help: bool,
    pub message: Option<String>,
}

impl Model {
    /// Build the window and UI root for a terminal of the given size.
    pub fn new(config: &TuicastConfig, width: u16, height: u16) -> Result<Self> {
        let window = NativeWindow::new(width, height.saturating_sub(PAGE_CHROME));
        window.set_content_height(config.window.content_height);

        let gui = Gui::create();
        let charmap = Rc::new(RefCell::new(CharmapState::new(dialog_width(width))));
        let log = Rc::new(RefCell::new(EventLog::default()));

        let banner = gui
            .mount(banner_spec())
            .wrap_err("Failed to mount banner")?;
        gui.mount(charmap_spec(&charmap)?)
            .wrap_err("Failed to mount special character dialog")?;
        gui.mount(event_log_spec(&log)?)
            .wrap_err("Failed to mount event log")?;

        let mut disposers = Vec::new();
        for (native, id) in [
            (NATIVE_SCROLL, WINDOW_SCROLL),
            (NATIVE_RESIZE, WINDOW_RESIZE),
            (NATIVE_DISMISS, DISMISS_POPUPS),
        ] {
            disposers.push(gui.subscribe(&window, native, id)?);
        }

        let model = Self {
            window,
            gui,
            banner,
            charmap,
            log,
            disposers,
            picked: String::new(),
            quit: false,
            show_help: false,
            message: None,
        };
        model.window.scroll_to(0, config.window.scroll_y)?;
        Ok(model)
    }

    pub fn banner_text(&self) -> String {
        self.banner.dom().text.clone().unwrap_or_default()
    }

    pub fn scroll_y(&self) -> i32 {
        self.window.scroll_offset().1
    }

    /// Rows of the page viewport.
    pub fn page_height(&self) -> u16 {
        self.window.size().1
    }

    pub fn charmap_open(&self) -> bool {
        self.charmap.borrow().open
    }

    fn report(&mut self, what: &str, result: Result<bool>) {
        if let Err(e) = result {
            error!("{what} failed: {e:#}");
            self.message = Some(format!("{what} failed: {e}"));
        }
    }

    /// Tell the window the terminal changed size.
    pub fn terminal_resized(&mut self, width: u16, height: u16) {
        let result = self
            .window
            .resize(width, height.saturating_sub(PAGE_CHROME));
        self.report("Resize", result);
    }

    fn half_page(&self) -> i32 {
        i32::from((self.page_height() / 2).max(1))
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        let released = self.disposers.iter().filter(|d| d.dispose()).count();
        self.gui.teardown();
        info!(released, "TUI model dropped");
    }
}

impl Update<Msg> for Model {
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        let msg = msg?;

        match msg {
            Msg::Quit => {
                self.quit = true;
                None
            }
            Msg::ShowHelp => {
                self.show_help = true;
                None
            }
            Msg::HideHelp => {
                self.show_help = false;
                None
            }

            // Page scrolling goes through the window so subscribers hear it
            Msg::ScrollBy(dy) => {
                let result = self.window.scroll_by(dy);
                self.report("Scroll", result);
                None
            }
            Msg::HalfPageDown => Some(Msg::ScrollBy(self.half_page())),
            Msg::HalfPageUp => Some(Msg::ScrollBy(-self.half_page())),
            Msg::ScrollTop => {
                let result = self.window.scroll_to(0, 0);
                self.report("Scroll", result);
                None
            }
            Msg::ScrollBottom => {
                let result = self.window.scroll_to(0, self.window.max_scroll_y());
                self.report("Scroll", result);
                None
            }

            Msg::OpenCharmap => {
                self.charmap.borrow_mut().open();
                None
            }
            Msg::DismissPopups => {
                let result = self.window.fire(&RawEvent::Dismiss).map(|n| n > 0);
                self.report("Dismiss", result);
                None
            }
            Msg::CharmapQuery(query) => {
                self.charmap.borrow_mut().set_query(query);
                None
            }
            Msg::CharmapNextTab => {
                self.charmap.borrow_mut().next_tab();
                None
            }
            Msg::CharmapPrevTab => {
                self.charmap.borrow_mut().prev_tab();
                None
            }
            Msg::CharmapMove(delta) => {
                self.charmap.borrow_mut().move_selection(delta);
                None
            }
            Msg::CharmapPick => {
                let picked = self.charmap.borrow().selected_char();
                if let Some(ch) = picked {
                    self.picked.push(ch);
                    self.message = Some(format!("Picked {ch}"));
                }
                Some(Msg::DismissPopups)
            }

            Msg::TerminalResized(width, height) => {
                self.terminal_resized(width, height);
                None
            }

            Msg::SwitchToEventLog => None,
        }
    }
}

/// Status banner: its text follows the window's scroll offset.
fn banner_spec() -> ComponentSpec {
    let events = EventHandlers::derive([run(WINDOW_SCROLL, |banner, event| {
        if let RawEvent::Scroll { y, .. } = event.raw() {
            banner.set_text(format!("Scrolled to row {y}"));
        }
        Ok(())
    })])
    .unwrap_or_default();

    ComponentSpec::container(
        Dom::tag("header")
            .with_class("banner")
            .with_attr("data-name", "banner")
            .with_text("Scroll the page to update this banner"),
    )
    .with_events(events)
}

/// Special character dialog: re-laid out on resize, closed on dismiss.
fn charmap_spec(state: &Rc<RefCell<CharmapState>>) -> Result<ComponentSpec> {
    let on_resize = Rc::clone(state);
    let on_dismiss = Rc::clone(state);
    let events = EventHandlers::derive([
        run(WINDOW_RESIZE, move |dialog, event| {
            if let RawEvent::Resize { width, .. } = event.raw() {
                let mut state = on_resize.borrow_mut();
                state.resize(dialog_width(*width));
                dialog.set_style("height", state.panel_height.to_string());
            }
            Ok(())
        }),
        run(DISMISS_POPUPS, move |dialog, _| {
            on_dismiss.borrow_mut().close();
            dialog.set_attr("data-open", "false");
            Ok(())
        }),
    ])?;

    let height = state.borrow().panel_height.to_string();
    Ok(ComponentSpec::container(
        Dom::tag("dialog")
            .with_class("charmap")
            .with_attr("data-name", "charmap")
            .with_style("height", height),
    )
    .with_events(events))
}

/// Invisible listener that records every system broadcast.
fn event_log_spec(log: &Rc<RefCell<EventLog>>) -> Result<ComponentSpec> {
    let entries = [WINDOW_SCROLL, WINDOW_RESIZE, DISMISS_POPUPS].map(|id| {
        let log = Rc::clone(log);
        let recorded = id.clone();
        run(id, move |_, event| {
            log.borrow_mut()
                .push(recorded.clone(), event.raw().clone());
            Ok(())
        })
    });
    let events = EventHandlers::derive(entries)?;

    Ok(ComponentSpec::container(
        Dom::tag("div").with_attr("data-name", "event-log"),
    )
    .with_events(events))
}
