//! The special character dialog keeps its height while searching.
//!
//! The dialog is mounted as a component that re-lays itself out on window
//! resize broadcasts. Its panel is pinned to the tallest tab, so filtering
//! down to nothing must not shrink it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use color_eyre::eyre::{Result, ensure};
use tuicast::charmap::{CharmapState, DIALOG_CHROME_ROWS, all_chars, pinned_panel_height};
use tuicast::events::{DISMISS_POPUPS, NATIVE_DISMISS, NATIVE_RESIZE, WINDOW_RESIZE};
use tuicast::testing::{GuiSetup, Step, Waiter};
use tuicast::{ComponentSpec, Dom, EventHandlers, RawEvent, run};

const INTERVAL: Duration = Duration::from_millis(5);
const TIMEOUT: Duration = Duration::from_millis(500);

/// Dialog component sharing `state` with the test.
fn dialog(state: &Rc<RefCell<CharmapState>>) -> Result<ComponentSpec> {
    let on_resize = Rc::clone(state);
    let on_dismiss = Rc::clone(state);
    let events = EventHandlers::derive([
        run(WINDOW_RESIZE, move |dialog, event| {
            if let RawEvent::Resize { width, .. } = event.raw() {
                let mut state = on_resize.borrow_mut();
                state.resize(*width);
                dialog.set_style("height", state.dialog_height().to_string());
            }
            Ok(())
        }),
        run(DISMISS_POPUPS, move |dialog, _| {
            on_dismiss.borrow_mut().close();
            dialog.set_attr("data-open", "false");
            Ok(())
        }),
    ])?;
    let height = state.borrow().dialog_height().to_string();
    Ok(ComponentSpec::container(
        Dom::tag("dialog")
            .with_attr("data-name", "charmap")
            .with_style("height", height),
    )
    .with_events(events))
}

#[test]
fn dialog_height_is_unchanged_by_a_search_with_no_results() {
    let state = Rc::new(RefCell::new(CharmapState::new(GuiSetup::WINDOW_SIZE.0)));
    let heights = Rc::new(RefCell::new(Vec::new()));

    let result = GuiSetup::run(
        |_, _| dialog(&state),
        |_, _, component, _| {
            let measure = |label: &str| {
                let state = Rc::clone(&state);
                let heights = Rc::clone(&heights);
                let component = Rc::clone(component);
                Step::sync(format!("measure {label}"), move || {
                    let height = state.borrow().dialog_height();
                    let styled = component.dom().style("height").map(str::to_string);
                    ensure!(
                        styled.as_deref() == Some(height.to_string().as_str()),
                        "styled height {styled:?} does not match {height}"
                    );
                    heights.borrow_mut().push(height);
                    Ok(())
                })
            };
            let open = {
                let state = Rc::clone(&state);
                Step::sync("open dialog", move || {
                    state.borrow_mut().open();
                    Ok(())
                })
            };
            let search = {
                let state = Rc::clone(&state);
                Step::sync("search for a missing character", move || {
                    state.borrow_mut().set_query("nonexistent glyph xyz");
                    Ok(())
                })
            };
            let no_results = {
                let state = Rc::clone(&state);
                Step::sync("no results shown", move || {
                    let count = state.borrow().visible_count();
                    ensure!(count == 0, "still showing {count} results");
                    Ok(())
                })
            };

            vec![
                open,
                measure("before search"),
                search,
                Waiter::try_until("results cleared", no_results, INTERVAL, TIMEOUT),
                measure("after search"),
            ]
        },
    );

    result.unwrap();
    let heights = heights.borrow();
    assert_eq!(heights.len(), 2);
    assert_eq!(heights[0], heights[1]);
}

#[test]
fn panel_height_fits_the_tallest_tab() {
    let state = CharmapState::new(GuiSetup::WINDOW_SIZE.0);
    let rows_for_all = all_chars().len().div_ceil(usize::from(state.columns));

    assert_eq!(usize::from(state.panel_height), rows_for_all);
    assert_eq!(state.dialog_height(), state.panel_height + DIALOG_CHROME_ROWS);
}

#[test]
fn every_tab_and_query_keeps_the_same_height() {
    let mut state = CharmapState::new(40);
    state.open();
    let pinned = state.dialog_height();

    for _ in 0..6 {
        state.next_tab();
        assert_eq!(state.dialog_height(), pinned);
    }
    for query in ["arrow", "euro", "€", "no such thing"] {
        state.set_query(query);
        assert_eq!(state.dialog_height(), pinned, "query {query:?}");
    }
}

#[test]
fn resize_broadcast_re_lays_out_the_dialog() {
    let state = Rc::new(RefCell::new(CharmapState::new(GuiSetup::WINDOW_SIZE.0)));

    let result = GuiSetup::run(
        |_, _| dialog(&state),
        |window, gui, component, _| {
            let subscribe = {
                let (window, gui) = (Rc::clone(window), Rc::clone(gui));
                Step::sync("subscribe to resize", move || {
                    gui.subscribe(&window, NATIVE_RESIZE, WINDOW_RESIZE)?;
                    Ok(())
                })
            };
            let narrow = {
                let window = Rc::clone(window);
                Step::sync("narrow the window", move || {
                    window.resize(24, 24)?;
                    Ok(())
                })
            };
            let check = {
                let state = Rc::clone(&state);
                let component = Rc::clone(component);
                Step::sync("dialog follows the new width", move || {
                    let state = state.borrow();
                    ensure!(state.columns == 5, "expected 5 columns, got {}", state.columns);
                    ensure!(state.panel_height == pinned_panel_height(5));
                    let expected = state.dialog_height().to_string();
                    ensure!(component.dom().style("height") == Some(expected.as_str()));
                    Ok(())
                })
            };
            vec![subscribe, narrow, check]
        },
    );

    result.unwrap();
}

#[test]
fn dismiss_broadcast_closes_the_dialog() {
    let state = Rc::new(RefCell::new(CharmapState::new(GuiSetup::WINDOW_SIZE.0)));
    state.borrow_mut().open();

    let result = GuiSetup::run(
        |_, _| dialog(&state),
        |window, gui, component, _| {
            let window = Rc::clone(window);
            let gui = Rc::clone(gui);
            let component = Rc::clone(component);
            let state = Rc::clone(&state);
            vec![Step::sync("dismiss popups", move || {
                gui.subscribe(&window, NATIVE_DISMISS, DISMISS_POPUPS)?;
                let invoked = window.fire(&RawEvent::Dismiss)?;
                ensure!(invoked == 1, "expected one listener, got {invoked}");
                ensure!(!state.borrow().open, "dialog still open");
                ensure!(component.dom().attr("data-open") == Some("false"));
                Ok(())
            })]
        },
    );

    result.unwrap();
}
