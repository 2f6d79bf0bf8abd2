use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

thread_local! {
    static CLOCK: RefCell<Option<Rc<dyn Clock>>> = const { RefCell::new(None) };
}

/// Time source for timers and hooks.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Install the clock for the current thread. Platform sets this to SystemClock; tests use TestClock.
pub fn set_clock(clock: Box<dyn Clock>) {
    let clock: Rc<dyn Clock> = Rc::from(clock);
    CLOCK.with(|c| *c.borrow_mut() = Some(clock));
}

/// Remove an installed clock, falling back to the system clock.
pub fn reset_clock() {
    CLOCK.with(|c| *c.borrow_mut() = None);
}

/// Current time according to the installed clock.
pub fn now() -> Instant {
    let clock = CLOCK.with(|c| c.borrow().clone());
    clock.map(|c| c.now()).unwrap_or_else(Instant::now)
}

/// A test clock you can drive deterministically.
///
/// Clones share the same time, so a test keeps one handle and installs a clone:
///
/// ```rust
/// use lull_core::clock::*;
/// use web_time::Duration;
///
/// let clock = TestClock::new();
/// set_clock(Box::new(clock.clone()));
/// let t0 = now();
/// clock.advance(Duration::from_millis(30));
/// assert_eq!(now() - t0, Duration::from_millis(30));
/// ```
#[derive(Clone)]
pub struct TestClock {
    t: Rc<Cell<Instant>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(t: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }

    pub fn set(&self, t: Instant) {
        self.t.set(t);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}
