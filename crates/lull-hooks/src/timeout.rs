use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lull_core::{
    Signal, TimerHandle, disposable_effect, on_unmount, remember, scoped_effect, set_timeout, signal,
};
use web_time::Duration;

struct Inner {
    callback: RefCell<Rc<dyn Fn()>>,
    delay: Cell<Option<Duration>>,
    timer: RefCell<Option<TimerHandle>>,
    active: Signal<bool>,
    torn_down: Cell<bool>,
}

/// Single-shot timer with a live callback slot and an observable active flag.
///
/// A `None` delay disables it: `reset` then does nothing.
#[derive(Clone)]
pub struct Timeout {
    inner: Rc<Inner>,
}

impl Timeout {
    pub fn new(callback: impl Fn() + 'static, delay: Option<Duration>) -> Self {
        Self::from_rc(Rc::new(callback), delay)
    }

    fn from_rc(callback: Rc<dyn Fn()>, delay: Option<Duration>) -> Self {
        Self {
            inner: Rc::new(Inner {
                callback: RefCell::new(callback),
                delay: Cell::new(delay),
                timer: RefCell::new(None),
                active: signal(false),
                torn_down: Cell::new(false),
            }),
        }
    }

    /// Restart the countdown from now. Ignored once the owning scope is gone.
    pub fn reset(&self) {
        self.clear();
        if self.inner.torn_down.get() {
            log::trace!("timeout: reset after teardown ignored");
            return;
        }
        let Some(delay) = self.inner.delay.get() else {
            return;
        };

        let weak = Rc::downgrade(&self.inner);
        let handle = set_timeout(delay, move || {
            if let Some(inner) = weak.upgrade() {
                Timeout { inner }.fire();
            }
        });
        *self.inner.timer.borrow_mut() = Some(handle);
        self.inner.active.set(true);
    }

    /// Cancel the countdown. No-op when nothing is pending.
    pub fn clear(&self) {
        let handle = self.inner.timer.borrow_mut().take();
        if let Some(handle) = handle {
            handle.cancel();
            self.inner.active.set(false);
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    pub fn active(&self) -> Signal<bool> {
        self.inner.active.clone()
    }

    pub fn delay(&self) -> Option<Duration> {
        self.inner.delay.get()
    }

    /// Takes effect on the next `reset`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.inner.delay.set(delay);
    }

    pub fn set_callback(&self, callback: impl Fn() + 'static) {
        self.set_callback_rc(Rc::new(callback));
    }

    fn set_callback_rc(&self, callback: Rc<dyn Fn()>) {
        let old = self.inner.callback.replace(callback);
        drop(old);
    }

    fn tear_down(&self) {
        self.inner.torn_down.set(true);
        self.clear();
    }

    fn fire(&self) {
        let fired = self.inner.timer.borrow_mut().take();
        drop(fired);
        let callback = self.inner.callback.borrow().clone();
        callback();
        // A reset from inside the callback re-armed it; leave that active.
        if self.inner.timer.borrow().is_none() {
            self.inner.active.set(false);
        }
    }
}

/// Run `callback` once `delay` after mount, restarting whenever `delay`
/// changes. `None` disables the timer. Unmounting clears it.
pub fn use_timeout(callback: impl Fn() + 'static, delay: Option<Duration>) -> Timeout {
    let callback: Rc<dyn Fn()> = Rc::new(callback);
    let timeout = remember(|| {
        let timeout = Timeout::from_rc(callback.clone(), delay);
        let teardown = timeout.clone();
        scoped_effect(move || Box::new(move || teardown.tear_down()));
        timeout
    });
    timeout.set_callback_rc(callback);
    timeout.set_delay(delay);

    let t = (*timeout).clone();
    disposable_effect(delay, move || {
        t.reset();
        on_unmount(move || t.clear())
    });

    (*timeout).clone()
}
