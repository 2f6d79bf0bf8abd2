//! Thread-local timer queue.
//!
//! Timers never run inline: `set_timeout` only records a deadline, and the
//! platform loop calls [`run_due_timers`] (usually through `Host::tick`) to fire
//! whatever is due. Use [`next_deadline`] to decide how long to sleep.

use std::cell::RefCell;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::clock;

new_key_type! {
    struct TimerKey;
}

struct Entry {
    deadline: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerQueue {
    entries: SlotMap<TimerKey, Entry>,
    next_seq: u64,
}

thread_local! {
    static TIMERS: RefCell<TimerQueue> = RefCell::new(TimerQueue::default());
}

/// Owner of one scheduled callback. Dropping the handle cancels the timer.
///
/// A handle whose timer already fired is inert; cancelling it does nothing.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    key: TimerKey,
}

impl TimerHandle {
    /// Cancel the timer. Same as dropping the handle.
    pub fn cancel(self) {}

    pub fn is_pending(&self) -> bool {
        TIMERS
            .try_with(|t| t.borrow().entries.contains_key(self.key))
            .unwrap_or(false)
    }

    pub fn deadline(&self) -> Option<Instant> {
        TIMERS
            .try_with(|t| t.borrow().entries.get(self.key).map(|e| e.deadline))
            .ok()
            .flatten()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        // The callback may own other handles; drop it outside the borrow.
        let removed = TIMERS
            .try_with(|t| t.borrow_mut().entries.remove(self.key))
            .ok()
            .flatten();
        if removed.is_some() {
            log::trace!("timer: cancelled {:?}", self.key);
        }
        drop(removed);
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("key", &self.key)
            .field("deadline", &self.deadline())
            .finish()
    }
}

/// Schedule `f` to run once `delay` has elapsed on the current clock.
///
/// A zero delay still waits for the next [`run_due_timers`] pass.
pub fn set_timeout(delay: Duration, f: impl FnOnce() + 'static) -> TimerHandle {
    let deadline = clock::now() + delay;
    let key = TIMERS.with(|t| {
        let mut q = t.borrow_mut();
        let seq = q.next_seq;
        q.next_seq += 1;
        q.entries.insert(Entry {
            deadline,
            seq,
            callback: Box::new(f),
        })
    });
    log::trace!("timer: armed {key:?} for {delay:?}");
    TimerHandle { key }
}

pub fn clear_timeout(handle: TimerHandle) {
    handle.cancel();
}

/// Fire every timer that is due, earliest deadline first (ties in arming order).
///
/// Timers armed by callbacks during this pass wait for the next one, so a
/// zero-delay re-arm cannot spin. A timer cancelled by an earlier callback in the
/// same pass does not fire. Returns how many callbacks ran.
pub fn run_due_timers() -> usize {
    let now = clock::now();
    let horizon = TIMERS.with(|t| t.borrow().next_seq);
    let mut fired = 0;

    loop {
        let entry = TIMERS.with(|t| {
            let mut q = t.borrow_mut();
            let key = q
                .entries
                .iter()
                .filter(|(_, e)| e.deadline <= now && e.seq < horizon)
                .min_by_key(|(_, e)| (e.deadline, e.seq))
                .map(|(k, _)| k)?;
            q.entries.remove(key)
        });
        let Some(entry) = entry else { break };
        (entry.callback)();
        fired += 1;
    }

    if fired > 0 {
        log::trace!("timer: fired {fired} due timer(s)");
    }
    fired
}

/// Earliest pending deadline, if any timer is armed.
pub fn next_deadline() -> Option<Instant> {
    TIMERS.with(|t| t.borrow().entries.values().map(|e| e.deadline).min())
}

pub fn pending_timers() -> usize {
    TIMERS.with(|t| t.borrow().entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{TestClock, set_clock};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn install() -> TestClock {
        let clock = TestClock::new();
        set_clock(Box::new(clock.clone()));
        clock
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let clock = install();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let _b = set_timeout(ms(20), move || l.borrow_mut().push("b"));
        let l = log.clone();
        let _a = set_timeout(ms(10), move || l.borrow_mut().push("a"));
        let l = log.clone();
        let _c = set_timeout(ms(20), move || l.borrow_mut().push("c"));

        clock.advance(ms(5));
        assert_eq!(run_due_timers(), 0);

        clock.advance(ms(15));
        assert_eq!(run_due_timers(), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(pending_timers(), 0);
    }

    #[test]
    fn test_drop_cancels() {
        let clock = install();
        let fired = Rc::new(RefCell::new(false));

        let f = fired.clone();
        let handle = set_timeout(ms(10), move || *f.borrow_mut() = true);
        assert!(handle.is_pending());
        drop(handle);

        clock.advance(ms(10));
        run_due_timers();
        assert!(!*fired.borrow());
    }

    #[test]
    fn test_zero_delay_rearm_waits_for_next_pass() {
        let _clock = install();
        let count = Rc::new(RefCell::new(0));
        let slot: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));

        fn arm(count: Rc<RefCell<i32>>, slot: Rc<RefCell<Option<TimerHandle>>>) {
            let (c, s) = (count.clone(), slot.clone());
            let handle = set_timeout(Duration::ZERO, move || {
                *c.borrow_mut() += 1;
                arm(c.clone(), s.clone());
            });
            *slot.borrow_mut() = Some(handle);
        }

        arm(count.clone(), slot.clone());
        assert_eq!(*count.borrow(), 0);

        assert_eq!(run_due_timers(), 1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(run_due_timers(), 1);
        assert_eq!(*count.borrow(), 2);

        slot.borrow_mut().take();
        assert_eq!(pending_timers(), 0);
    }

    #[test]
    fn test_callback_cancels_sibling_due_in_same_pass() {
        let clock = install();
        let hits = Rc::new(RefCell::new(0));
        let sibling: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));

        let (h, s) = (hits.clone(), sibling.clone());
        let _first = set_timeout(ms(10), move || {
            *h.borrow_mut() += 1;
            s.borrow_mut().take();
        });
        let h = hits.clone();
        *sibling.borrow_mut() = Some(set_timeout(ms(10), move || *h.borrow_mut() += 1));

        clock.advance(ms(10));
        assert_eq!(run_due_timers(), 1);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_next_deadline() {
        let _clock = install();
        assert!(next_deadline().is_none());
        let t0 = clock::now();
        let _a = set_timeout(ms(30), || {});
        let b = set_timeout(ms(10), || {});
        assert_eq!(next_deadline(), Some(t0 + ms(10)));
        clear_timeout(b);
        assert_eq!(next_deadline(), Some(t0 + ms(30)));
    }
}
