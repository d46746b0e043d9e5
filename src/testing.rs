//! Harness for driving a UI root from tests.
//!
//! A test builds a tree in `setup`, then returns a list of [`Step`]s from
//! `interaction`. Steps run in order; the first failure aborts the run with a
//! message naming the step. Waits are bounded: [`Waiter::try_until`] retries a
//! step at an interval until it passes or the timeout elapses.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr, bail};

use crate::component::{Component, ComponentSpec, GuiFactory};
use crate::dispatcher::Disposer;
use crate::gui::Gui;
use crate::native::NativeWindow;

/// Records string values produced by handlers under test.
#[derive(Debug, Default)]
pub struct TestStore {
    entries: RefCell<Vec<String>>,
}

impl TestStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add(&self, value: impl Into<String>) {
        self.entries.borrow_mut().push(value.into());
    }

    /// A callback that records `value` each time it is called.
    pub fn adder(self: &Rc<Self>, value: impl Into<String>) -> impl Fn() + 'static {
        let store = Rc::clone(self);
        let value = value.into();
        move || store.add(value.clone())
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Fail unless the recorded values equal `expected`, in order.
    pub fn assert_eq(&self, message: &str, expected: &[&str]) -> Result<()> {
        let actual = self.entries.borrow();
        if actual.iter().map(String::as_str).ne(expected.iter().copied()) {
            bail!("{message}: expected {expected:?}, got {actual:?}");
        }
        Ok(())
    }

    /// Step that clears the store.
    pub fn s_clear(self: &Rc<Self>) -> Step {
        let store = Rc::clone(self);
        Step::sync("clear store", move || {
            store.clear();
            Ok(())
        })
    }

    /// Step that asserts the store contents. Re-runnable, so it can be wrapped
    /// in [`Waiter::try_until`].
    pub fn s_assert_eq(self: &Rc<Self>, message: &str, expected: &[&str]) -> Step {
        let store = Rc::clone(self);
        let message = message.to_string();
        let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        Step::sync(format!("assert store: {message}"), move || {
            let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
            store.assert_eq(&message, &expected)
        })
    }
}

/// A named, re-runnable unit of test work.
pub struct Step {
    label: String,
    action: Box<dyn FnMut() -> Result<()>>,
}

impl Step {
    pub fn sync(label: impl Into<String>, action: impl FnMut() -> Result<()> + 'static) -> Self {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn run(&mut self) -> Result<()> {
        (self.action)()
    }
}

/// Bounded polling.
pub struct Waiter;

impl Waiter {
    /// Retry `step` every `interval` until it passes or `timeout` elapses.
    pub fn try_until(label: &str, mut step: Step, interval: Duration, timeout: Duration) -> Step {
        let label = label.to_string();
        Step::sync(label.clone(), move || {
            let deadline = Instant::now() + timeout;
            loop {
                match step.run() {
                    Ok(()) => return Ok(()),
                    Err(e) if Instant::now() >= deadline => {
                        return Err(e).wrap_err_with(|| {
                            format!("{label}: gave up after {}ms", timeout.as_millis())
                        });
                    }
                    Err(_) => thread::sleep(interval),
                }
            }
        })
    }
}

/// Collects cleanup work and runs it exactly once.
#[derive(Default)]
pub struct Cleaner {
    tasks: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl Cleaner {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push(Box::new(task));
    }

    pub fn add_disposer(&self, disposer: Disposer) {
        self.add(move || {
            disposer.dispose();
        });
    }

    /// Run all pending tasks, most recent first.
    pub fn run(&self) {
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        for task in tasks.into_iter().rev() {
            task();
        }
    }

    /// Run `body`, then clean up whether it passed or failed.
    pub fn wrap<T>(&self, body: impl FnOnce() -> Result<T>) -> Result<T> {
        let result = body();
        self.run();
        result
    }
}

/// Run steps in order, stopping at the first failure.
pub fn run_steps(steps: Vec<Step>) -> Result<()> {
    for (idx, mut step) in steps.into_iter().enumerate() {
        step.run()
            .wrap_err_with(|| format!("step {} ({}) failed", idx + 1, step.label()))?;
    }
    Ok(())
}

/// Sets up a root, mounts a tree, runs interaction steps, and tears down.
pub struct GuiSetup;

impl GuiSetup {
    /// Default viewport size for harness windows.
    pub const WINDOW_SIZE: (u16, u16) = (80, 24);

    pub fn run<S, I>(setup: S, interaction: I) -> Result<()>
    where
        S: FnOnce(&Rc<TestStore>, &Rc<NativeWindow>) -> Result<ComponentSpec>,
        I: FnOnce(&Rc<NativeWindow>, &Rc<Gui>, &Rc<Component>, &Rc<TestStore>) -> Vec<Step>,
    {
        let store = TestStore::new();
        let window = NativeWindow::new(Self::WINDOW_SIZE.0, Self::WINDOW_SIZE.1);
        let gui = Gui::create();

        let spec = setup(&store, &window).wrap_err("setup failed")?;
        let component = GuiFactory::build(spec);
        gui.add(Rc::clone(&component))?;

        let steps = interaction(&window, &gui, &component, &store);
        let result = run_steps(steps);
        gui.teardown();
        result
    }

    /// Step that sets the scrollable content height of a window.
    pub fn s_set_content_height(window: &Rc<NativeWindow>, height: u32) -> Step {
        let window = Rc::clone(window);
        Step::sync(format!("set content height to {height}"), move || {
            window.set_content_height(height);
            Ok(())
        })
    }
}
