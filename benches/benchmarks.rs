//! Performance benchmarks for event broadcasting.
//!
//! Measures the hot paths:
//! - Broadcast over a wide tree where few components are interested
//! - Broadcast over a deep tree where every component is interested
//! - Native scroll through a root subscription
//! - Headless replay
//! - Special character search

use std::cell::Cell;
use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tuicast::charmap::search;
use tuicast::events::{NATIVE_SCROLL, WINDOW_RESIZE, WINDOW_SCROLL};
use tuicast::replay::{ReplayStep, WindowState, replay};
use tuicast::{ComponentSpec, Dom, EventHandlers, Gui, NativeWindow, RawEvent, run};

fn counting(hits: &Rc<Cell<usize>>, interested: bool) -> ComponentSpec {
    let spec = ComponentSpec::container(Dom::tag("div"));
    if !interested {
        return spec;
    }
    let hits = Rc::clone(hits);
    let events = EventHandlers::derive([run(WINDOW_SCROLL, move |_, _| {
        hits.set(hits.get() + 1);
        Ok(())
    })])
    .unwrap();
    spec.with_events(events)
}

/// Benchmark a scroll broadcast over 1000 siblings, one in ten interested.
fn bench_broadcast_wide(c: &mut Criterion) {
    let hits = Rc::new(Cell::new(0));
    let gui = Gui::create();
    for i in 0..1000 {
        gui.mount(counting(&hits, i % 10 == 0)).unwrap();
    }

    c.bench_function("broadcast_wide_1000", |b| {
        b.iter(|| {
            gui.broadcast_event(&WINDOW_SCROLL, black_box(RawEvent::Scroll { x: 0, y: 1 }))
                .unwrap()
        })
    });
}

/// Benchmark a scroll broadcast down a 200-deep chain, all interested.
fn bench_broadcast_deep(c: &mut Criterion) {
    let hits = Rc::new(Cell::new(0));
    let gui = Gui::create();
    let mut chain = counting(&hits, true);
    for _ in 0..199 {
        chain = counting(&hits, true).with_components(vec![chain]);
    }
    gui.mount(chain).unwrap();

    c.bench_function("broadcast_deep_200", |b| {
        b.iter(|| {
            gui.broadcast_event(&WINDOW_SCROLL, black_box(RawEvent::Scroll { x: 0, y: 1 }))
                .unwrap()
        })
    });
}

/// Benchmark a broadcast nobody handles (early exit on the registry).
fn bench_broadcast_uninterested(c: &mut Criterion) {
    let hits = Rc::new(Cell::new(0));
    let gui = Gui::create();
    for _ in 0..1000 {
        gui.mount(counting(&hits, true)).unwrap();
    }

    c.bench_function("broadcast_uninterested_1000", |b| {
        b.iter(|| {
            gui.broadcast_event(
                &WINDOW_RESIZE,
                black_box(RawEvent::Resize {
                    width: 80,
                    height: 24,
                }),
            )
            .unwrap()
        })
    });
}

/// Benchmark native scrolling through a root subscription.
fn bench_native_scroll(c: &mut Criterion) {
    let hits = Rc::new(Cell::new(0));
    let window = NativeWindow::new(80, 24);
    window.set_content_height(10_000);
    let gui = Gui::create();
    for i in 0..100 {
        gui.mount(counting(&hits, i % 2 == 0)).unwrap();
    }
    let _subscription = gui.subscribe(&window, NATIVE_SCROLL, WINDOW_SCROLL).unwrap();

    let mut y = 0;
    c.bench_function("native_scroll_100", |b| {
        b.iter(|| {
            y = (y + 1) % 5_000;
            window.scroll_to(0, black_box(y)).unwrap()
        })
    });
}

/// Benchmark a short headless replay, including tree setup and teardown.
fn bench_replay(c: &mut Criterion) {
    let initial = WindowState {
        width: 80,
        height: 24,
        content_height: 200,
        scroll_y: 0,
    };
    let steps = vec![
        ReplayStep::Scroll { y: 100 },
        ReplayStep::Resize {
            width: 120,
            height: 40,
        },
        ReplayStep::Dismiss,
        ReplayStep::Scroll { y: 0 },
    ];

    c.bench_function("replay_4_steps", |b| {
        b.iter(|| replay(black_box(initial), black_box(&steps)).unwrap())
    });
}

/// Benchmark special character search.
fn bench_charmap_search(c: &mut Criterion) {
    c.bench_function("charmap_search", |b| b.iter(|| search(black_box("arrow"))));
}

criterion_group!(
    benches,
    bench_broadcast_wide,
    bench_broadcast_deep,
    bench_broadcast_uninterested,
    bench_native_scroll,
    bench_replay,
    bench_charmap_search,
);
criterion_main!(benches);
