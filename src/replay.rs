//! Headless replay of native window events against a demo tree.
//!
//! Each step drives the native window the way a terminal would. The root's
//! dispatcher turns the native events into broadcasts, and the trace records
//! which components handled each one.

use std::cell::RefCell;
use std::rc::Rc;

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(debug_assertions)]
use tracing::instrument;

use crate::component::{ComponentSpec, Dom};
use crate::error::BroadcastError;
use crate::events::{
    DISMISS_POPUPS, EventId, NATIVE_DISMISS, NATIVE_RESIZE, NATIVE_SCROLL, WINDOW_RESIZE,
    WINDOW_SCROLL,
};
use crate::gui::Gui;
use crate::handlers::{EventHandlers, run};
use crate::native::{NativeWindow, RawEvent};

/// One native event to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReplayStep {
    Scroll { y: i32 },
    Resize { width: u16, height: u16 },
    Dismiss,
}

impl std::str::FromStr for ReplayStep {
    type Err = String;

    /// Parse `scroll:Y`, `resize:WxH`, or `dismiss`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = s.split_once(':').unwrap_or((s, ""));
        match kind.trim().to_lowercase().as_str() {
            "scroll" => arg
                .trim()
                .parse()
                .map(|y| Self::Scroll { y })
                .map_err(|e| format!("invalid scroll offset '{arg}': {e}")),
            "resize" => {
                let (w, h) = arg
                    .split_once('x')
                    .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{arg}'"))?;
                let width = w.trim().parse().map_err(|e| format!("invalid width '{w}': {e}"))?;
                let height = h.trim().parse().map_err(|e| format!("invalid height '{h}': {e}"))?;
                Ok(Self::Resize { width, height })
            }
            "dismiss" => Ok(Self::Dismiss),
            other => Err(format!(
                "unknown step '{other}' (expected scroll:Y, resize:WxH, or dismiss)"
            )),
        }
    }
}

/// Window the replay runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub width: u16,
    pub height: u16,
    pub content_height: u32,
    pub scroll_y: i32,
}

/// What happened for one replayed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub step: usize,
    pub native: RawEvent,
    /// Whether the window actually emitted the native event
    pub fired: bool,
    pub event: EventId,
    /// Names of the components whose handler ran, in order
    pub delivered: Vec<String>,
}

/// Full replay result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayTrace {
    pub initial: WindowState,
    pub entries: Vec<TraceEntry>,
    #[serde(rename = "final")]
    pub final_state: WindowState,
}

type Deliveries = Rc<RefCell<Vec<String>>>;

fn recording(
    name: &str,
    ids: &[EventId],
    log: &Deliveries,
) -> Result<ComponentSpec, BroadcastError> {
    let entries = ids.iter().map(|id| {
        let log = Rc::clone(log);
        run(id.clone(), move |component, event| {
            component.set_attr("data-last-event", event.raw().event_type());
            log.borrow_mut().push(component.name());
            Ok(())
        })
    });
    let events = EventHandlers::derive(entries)?;
    Ok(ComponentSpec::container(Dom::tag("div").with_attr("data-name", name)).with_events(events))
}

/// The tree every replay runs against.
///
/// ```text
/// page
/// ├── header       scroll
/// │   └── progress scroll
/// ├── body
/// ├── sidebar      resize
/// └── popup        resize, dismiss
/// ```
pub fn demo_tree(log: &Deliveries) -> Result<ComponentSpec, BroadcastError> {
    Ok(recording("page", &[], log)?.with_components(vec![
        recording("header", &[WINDOW_SCROLL], log)?
            .with_components(vec![recording("progress", &[WINDOW_SCROLL], log)?]),
        recording("body", &[], log)?,
        recording("sidebar", &[WINDOW_RESIZE], log)?,
        recording("popup", &[WINDOW_RESIZE, DISMISS_POPUPS], log)?,
    ]))
}

fn window_state(window: &NativeWindow) -> WindowState {
    let (width, height) = window.size();
    WindowState {
        width,
        height,
        content_height: window.content_height(),
        scroll_y: window.scroll_offset().1,
    }
}

/// Replay `steps` in a fresh window and root, returning the trace.
#[cfg_attr(debug_assertions, instrument(skip(steps), fields(steps = steps.len())))]
pub fn replay(initial: WindowState, steps: &[ReplayStep]) -> Result<ReplayTrace> {
    let window = NativeWindow::new(initial.width, initial.height);
    window.set_content_height(initial.content_height);
    window
        .scroll_to(0, initial.scroll_y)
        .wrap_err("Failed to apply initial scroll offset")?;

    let gui = Gui::create();
    let log: Deliveries = Rc::new(RefCell::new(Vec::new()));
    gui.mount(demo_tree(&log)?)?;

    for (native, id) in [
        (NATIVE_SCROLL, WINDOW_SCROLL),
        (NATIVE_RESIZE, WINDOW_RESIZE),
        (NATIVE_DISMISS, DISMISS_POPUPS),
    ] {
        gui.subscribe(&window, native, id)?;
    }
    let initial = window_state(&window);

    let mut entries = Vec::with_capacity(steps.len());
    for (idx, step) in steps.iter().enumerate() {
        let (native, event, fired) = match *step {
            ReplayStep::Scroll { y } => {
                let fired = window
                    .scroll_to(0, y)
                    .wrap_err_with(|| format!("Step {}: scroll to {y} failed", idx + 1))?;
                let (x, y) = window.scroll_offset();
                (RawEvent::Scroll { x, y }, WINDOW_SCROLL, fired)
            }
            ReplayStep::Resize { width, height } => {
                let fired = window
                    .resize(width, height)
                    .wrap_err_with(|| format!("Step {}: resize failed", idx + 1))?;
                (RawEvent::Resize { width, height }, WINDOW_RESIZE, fired)
            }
            ReplayStep::Dismiss => {
                let raw = RawEvent::Dismiss;
                let fired = window
                    .fire(&raw)
                    .wrap_err_with(|| format!("Step {}: dismiss failed", idx + 1))?
                    > 0;
                (raw, DISMISS_POPUPS, fired)
            }
        };
        entries.push(TraceEntry {
            step: idx + 1,
            native,
            fired,
            event,
            delivered: std::mem::take(&mut *log.borrow_mut()),
        });
    }

    let final_state = window_state(&window);
    gui.teardown();
    info!(steps = entries.len(), "replay finished");

    Ok(ReplayTrace {
        initial,
        entries,
        final_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> WindowState {
        WindowState {
            width: 80,
            height: 24,
            content_height: 200,
            scroll_y: 0,
        }
    }

    #[test]
    fn repeated_event_in_a_recording_is_an_error() {
        let log: Deliveries = Rc::new(RefCell::new(Vec::new()));
        let err = recording("twice", &[WINDOW_SCROLL, WINDOW_SCROLL], &log).unwrap_err();
        assert!(matches!(err, BroadcastError::DuplicateHandler(id) if id == WINDOW_SCROLL));
    }

    #[test]
    fn demo_tree_builds() {
        let log: Deliveries = Rc::new(RefCell::new(Vec::new()));
        let tree = demo_tree(&log).unwrap();
        assert_eq!(tree.components.len(), 4);
    }

    #[test]
    fn parses_step_syntax() {
        assert_eq!("scroll:100".parse(), Ok(ReplayStep::Scroll { y: 100 }));
        assert_eq!(
            "resize:120x40".parse(),
            Ok(ReplayStep::Resize {
                width: 120,
                height: 40
            })
        );
        assert_eq!("dismiss".parse(), Ok(ReplayStep::Dismiss));
        assert!("jump:3".parse::<ReplayStep>().is_err());
        assert!("resize:120".parse::<ReplayStep>().is_err());
    }

    #[test]
    fn scroll_reaches_header_then_progress() {
        let trace = replay(window(), &[ReplayStep::Scroll { y: 100 }]).unwrap();

        let entry = &trace.entries[0];
        assert!(entry.fired);
        assert_eq!(entry.delivered, ["header", "progress"]);
        assert_eq!(trace.final_state.scroll_y, 100);
    }

    #[test]
    fn unchanged_scroll_delivers_nothing() {
        let trace = replay(window(), &[ReplayStep::Scroll { y: 0 }]).unwrap();

        assert!(!trace.entries[0].fired);
        assert!(trace.entries[0].delivered.is_empty());
    }

    #[test]
    fn dismiss_reaches_only_the_popup() {
        let trace = replay(window(), &[ReplayStep::Dismiss]).unwrap();

        assert_eq!(trace.entries[0].delivered, ["popup"]);
    }
}
