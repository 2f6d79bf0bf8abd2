//! Debounced callbacks with leading/trailing edges and a max-wait ceiling.
//!
//! A [`Debouncer`] coalesces a burst of [`Debouncer::trigger`] calls into at
//! most one trailing invocation, fired `delay` after the last trigger, or at
//! `max_wait` after the first one if triggers keep arriving. With `leading` set,
//! the first trigger after creation (or after [`Debouncer::cancel`]) invokes
//! immediately instead.
//!
//! ```rust
//! use lull_core::*;
//! use lull_hooks::{DebounceOptions, Debouncer};
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! set_clock(Box::new(clock.clone()));
//!
//! let last = signal(String::new());
//! let search = Debouncer::new(
//!     { let last = last.clone(); move |q: String| last.set(q) },
//!     DebounceOptions::new(Duration::from_millis(100)),
//! );
//!
//! search.trigger("r".into());
//! search.trigger("ru".into());
//! search.trigger("rust".into());
//!
//! clock.advance(Duration::from_millis(100));
//! run_due_timers();
//! assert_eq!(last.get(), "rust");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use lull_core::{TimerHandle, remember, scoped_effect, set_timeout};
use web_time::{Duration, Instant};

/// Policy for a [`Debouncer`].
///
/// With both `leading` and `trailing` off the debouncer never invokes, with or
/// without `max_wait`. That is a valid, inert configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebounceOptions {
    /// Quiet time after the last trigger before the trailing invocation.
    pub delay: Duration,
    /// Upper bound on deferral, measured from the first trigger of a burst.
    pub max_wait: Option<Duration>,
    pub leading: bool,
    pub trailing: bool,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            max_wait: None,
            leading: false,
            trailing: true,
        }
    }
}

impl DebounceOptions {
    /// Trailing-edge only.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn trailing(delay: Duration) -> Self {
        Self::new(delay)
    }

    /// Leading-edge only.
    pub fn leading(delay: Duration) -> Self {
        Self {
            delay,
            leading: true,
            trailing: false,
            ..Self::default()
        }
    }

    pub fn leading_and_trailing(delay: Duration) -> Self {
        Self {
            delay,
            leading: true,
            trailing: true,
            ..Self::default()
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn is_inert(&self) -> bool {
        !self.leading && !self.trailing
    }
}

struct State<A> {
    options: DebounceOptions,
    delay_timer: Option<TimerHandle>,
    max_wait_timer: Option<TimerHandle>,
    last_invoke: Option<Instant>,
    pending_args: Option<A>,
    torn_down: bool,
}

type Timers = (Option<TimerHandle>, Option<TimerHandle>);

impl<A> State<A> {
    fn is_pending(&self) -> bool {
        self.delay_timer.is_some() || self.max_wait_timer.is_some()
    }

    /// Both handles, to be dropped (and so cancelled) once the borrow is released.
    fn take_timers(&mut self) -> Timers {
        (self.delay_timer.take(), self.max_wait_timer.take())
    }
}

struct Inner<A> {
    callback: RefCell<Rc<dyn Fn(A)>>,
    state: RefCell<State<A>>,
}

/// Cloneable handle to one debounce scheduler. Clones share state.
///
/// Pending timers only hold a weak reference: dropping the last handle cancels
/// them.
pub struct Debouncer<A: 'static> {
    inner: Rc<Inner<A>>,
}

impl<A: 'static> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A: 'static> Debouncer<A> {
    pub fn new(callback: impl Fn(A) + 'static, options: DebounceOptions) -> Self {
        Self::from_rc(Rc::new(callback), options)
    }

    fn from_rc(callback: Rc<dyn Fn(A)>, options: DebounceOptions) -> Self {
        Self {
            inner: Rc::new(Inner {
                callback: RefCell::new(callback),
                state: RefCell::new(State {
                    options,
                    delay_timer: None,
                    max_wait_timer: None,
                    last_invoke: None,
                    pending_args: None,
                    torn_down: false,
                }),
            }),
        }
    }

    /// Request an invocation with `args`. Never blocks; the trailing call runs
    /// from a later timer pass with the most recent `args`. Ignored once the
    /// owning scope has been torn down.
    pub fn trigger(&self, args: A) {
        let mut st = self.inner.state.borrow_mut();
        if st.torn_down {
            log::trace!("debounce: trigger after teardown ignored");
            return;
        }
        let opts = st.options;

        if opts.leading && st.last_invoke.is_none() {
            let timers = st.take_timers();
            let stale = st.pending_args.take();
            st.last_invoke = Some(lull_core::now());
            drop(st);
            drop((timers, stale));
            log::trace!("debounce: leading edge");
            self.call(args);
            return;
        }

        let previous = st.delay_timer.take();
        let mut replaced = None;
        if opts.trailing {
            let arm_max_wait = opts.max_wait.filter(|_| st.max_wait_timer.is_none());
            if let Some(max_wait) = arm_max_wait {
                st.max_wait_timer = Some(self.arm(max_wait));
            }
            st.delay_timer = Some(self.arm(opts.delay));
            replaced = st.pending_args.replace(args);
        }
        drop(st);
        drop((previous, replaced));
    }

    /// Drop any pending invocation and forget the current burst. Idempotent.
    pub fn cancel(&self) {
        let mut st = self.inner.state.borrow_mut();
        let timers = st.take_timers();
        let args = st.pending_args.take();
        let was_pending = timers.0.is_some() || timers.1.is_some();
        st.last_invoke = None;
        drop(st);
        drop((timers, args));
        if was_pending {
            log::trace!("debounce: cancelled pending invocation");
        }
    }

    /// Swap the callback. Pending timers will call the new one.
    pub fn set_callback(&self, callback: impl Fn(A) + 'static) {
        self.set_callback_rc(Rc::new(callback));
    }

    fn set_callback_rc(&self, callback: Rc<dyn Fn(A)>) {
        let old = self.inner.callback.replace(callback);
        drop(old);
    }

    /// Replace the policy for later triggers; pending timers keep their deadlines.
    pub fn set_options(&self, options: DebounceOptions) {
        self.inner.state.borrow_mut().options = options;
    }

    pub fn options(&self) -> DebounceOptions {
        self.inner.state.borrow().options
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().is_pending()
    }

    /// Time of the most recent invocation since creation or the last `cancel`.
    pub fn last_invoke(&self) -> Option<Instant> {
        self.inner.state.borrow().last_invoke
    }

    /// The trigger as a plain callback, for wiring into event handlers.
    pub fn trigger_fn(&self) -> Rc<dyn Fn(A)> {
        let this = self.clone();
        Rc::new(move |args| this.trigger(args))
    }

    pub fn cancel_fn(&self) -> Rc<dyn Fn()> {
        let this = self.clone();
        Rc::new(move || this.cancel())
    }

    /// Cancel and refuse every later trigger.
    fn tear_down(&self) {
        self.inner.state.borrow_mut().torn_down = true;
        self.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.state.borrow().torn_down
    }

    fn arm(&self, after: Duration) -> TimerHandle {
        let weak = Rc::downgrade(&self.inner);
        set_timeout(after, move || {
            if let Some(inner) = weak.upgrade() {
                Debouncer { inner }.fire();
            }
        })
    }

    /// Timer path: whichever of the two timers gets here first wins and cancels the other.
    fn fire(&self) {
        let mut st = self.inner.state.borrow_mut();
        let timers = st.take_timers();
        let args = st.pending_args.take();
        if args.is_some() {
            st.last_invoke = Some(lull_core::now());
        }
        drop(st);
        drop(timers);

        if let Some(args) = args {
            log::trace!("debounce: trailing invoke");
            self.call(args);
        }
    }

    fn call(&self, args: A) {
        // Clone out of the slot so the callback can replace itself.
        let callback = self.inner.callback.borrow().clone();
        callback(args);
    }
}

/// Debounce `callback` for the current call-site.
///
/// The scheduler is created on first composition and lives as long as the
/// host. Every composition refreshes the callback and options without touching
/// pending timers, so a trailing call always runs the newest closure. Unmounting
/// the host cancels it, and later triggers through a kept handle are ignored.
pub fn use_debounce<A: 'static>(
    callback: impl Fn(A) + 'static,
    options: DebounceOptions,
) -> Debouncer<A> {
    let callback: Rc<dyn Fn(A)> = Rc::new(callback);
    let debouncer = remember(|| {
        let debouncer = Debouncer::from_rc(callback.clone(), options);
        let teardown = debouncer.clone();
        scoped_effect(move || Box::new(move || teardown.tear_down()));
        debouncer
    });
    debouncer.set_callback_rc(callback);
    debouncer.set_options(options);
    (*debouncer).clone()
}
