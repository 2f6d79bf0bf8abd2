#[cfg(test)]
mod tests {
    use crate::clock::*;
    use crate::effects::*;
    use crate::runtime::*;
    use crate::scope::*;
    use crate::signal::*;
    use crate::timer::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_time::Duration;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let id = sig.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        sig.set(42);
        sig.unsubscribe(id);
        sig.set(7);
        assert_eq!(*seen.borrow(), vec![42]);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(RefCell::new(0));

        let scope = Scope::new();
        let cleaned_up_clone = cleaned_up.clone();
        scope.add_disposer(move || {
            *cleaned_up_clone.borrow_mut() += 1;
        });

        assert_eq!(*cleaned_up.borrow(), 0);
        scope.dispose();
        scope.dispose();
        assert_eq!(*cleaned_up.borrow(), 1);
    }

    #[test]
    fn test_scope_children_dispose_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = Scope::new();
        let child = parent.child();

        let o = order.clone();
        parent.add_disposer(move || o.borrow_mut().push("parent"));
        let o = order.clone();
        child.add_disposer(move || o.borrow_mut().push("child"));

        parent.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
        assert!(child.is_disposed());
    }

    #[test]
    fn test_disposer_after_dispose_runs_now() {
        let scope = Scope::new();
        scope.dispose();

        let ran = Rc::new(RefCell::new(false));
        let r = ran.clone();
        scope.add_disposer(move || *r.borrow_mut() = true);
        assert!(*ran.borrow());
    }

    #[test]
    fn test_scope_drop_disposes() {
        let cleaned_up = Rc::new(RefCell::new(false));
        {
            let scope = Scope::new();
            let c = cleaned_up.clone();
            scope.add_disposer(move || *c.borrow_mut() = true);
        }
        assert!(*cleaned_up.borrow());
    }

    #[test]
    fn test_positional_remember_is_stable_across_frames() {
        let mut host = Host::new();
        let mut seen = Vec::new();

        for _ in 0..3 {
            let (a, b) = host.frame(|| {
                let a = remember(|| RefCell::new(0));
                *a.borrow_mut() += 1;
                let b = remember(|| "b");
                (*a.borrow(), *b)
            });
            seen.push((a, b));
        }

        assert_eq!(seen, vec![(1, "b"), (2, "b"), (3, "b")]);
        assert_eq!(host.slot_count(), 2);
        assert_eq!(host.frames(), 3);
    }

    #[test]
    fn test_key_based_remember() {
        let mut host = Host::new();
        let (v1, v2) = host.frame(|| {
            let val1 = remember_with_key("test", || 42);
            let val2 = remember_with_key("test", || 100);
            (*val1, *val2)
        });

        // Same instance; the second init never runs.
        assert_eq!(v1, 42);
        assert_eq!(v2, 42);
    }

    #[test]
    fn test_keyed_state_survives_frames() {
        let mut host = Host::new();
        for _ in 0..3 {
            host.frame(|| *remember_state_with_key("clicks", || 0).borrow_mut() += 1);
        }
        let clicks = host.frame(|| *remember_state_with_key("clicks", || 0).borrow());
        assert_eq!(clicks, 3);
    }

    #[test]
    fn test_reset_clock_falls_back_to_system_time() {
        let frozen = TestClock::starting_at(web_time::Instant::now() - Duration::from_secs(3600));
        set_clock(Box::new(frozen.clone()));
        assert_eq!(now(), frozen.now());

        reset_clock();
        assert!(now() > frozen.now());
    }

    #[test]
    fn test_hosts_keep_separate_slots() {
        let mut a = Host::new();
        let mut b = Host::new();

        a.frame(|| *remember_state(|| 0).borrow_mut() = 5);
        let in_b = b.frame(|| *remember_state(|| 0).borrow());
        let in_a = a.frame(|| *remember_state(|| 0).borrow());

        assert_eq!(in_b, 0);
        assert_eq!(in_a, 5);
    }

    #[test]
    fn test_viewport_visible_only_while_composing() {
        let mut host = Host::with_viewport(Viewport::new(640, 480));
        assert_eq!(current_viewport(), None);
        let inside = host.frame(current_viewport);
        assert_eq!(inside, Some(Viewport::new(640, 480)));

        host.resize(300, 600);
        assert_eq!(host.frame(current_viewport), Some(Viewport::new(300, 600)));
        assert_eq!(current_viewport(), None);
    }

    #[test]
    fn test_unmount_runs_effect_cleanup_once() {
        let cleaned = Rc::new(RefCell::new(0));
        let mut host = Host::new();

        for _ in 0..2 {
            let c = cleaned.clone();
            host.frame(move || {
                let installed = remember(|| RefCell::new(false));
                if !*installed.borrow() {
                    *installed.borrow_mut() = true;
                    scoped_effect(move || Box::new(move || *c.borrow_mut() += 1));
                }
            });
        }

        assert_eq!(*cleaned.borrow(), 0);
        host.unmount();
        host.unmount();
        assert_eq!(*cleaned.borrow(), 1);
        assert!(!host.is_mounted());
    }

    #[test]
    fn test_effect_dispose_runs_once() {
        let runs = Rc::new(RefCell::new(0));
        let mut host = Host::new();

        let r = runs.clone();
        let d = host.frame(move || effect(move || on_unmount(move || *r.borrow_mut() += 1)));
        d.run();
        host.unmount();
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn test_disposable_effect_reruns_on_key_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::new();

        for key in [1, 1, 2] {
            let log = log.clone();
            host.frame(move || {
                disposable_effect(key, move || {
                    log.borrow_mut().push(format!("start {key}"));
                    on_unmount(move || log.borrow_mut().push(format!("stop {key}")))
                });
            });
        }
        host.unmount();

        assert_eq!(
            *log.borrow(),
            vec!["start 1", "stop 1", "start 2", "stop 2"]
        );
    }

    #[test]
    fn test_host_tick_fires_remembered_timer() {
        let clock = TestClock::new();
        set_clock(Box::new(clock.clone()));
        let fired = signal(0);
        let mut host = Host::new();

        for _ in 0..2 {
            let fired = fired.clone();
            host.frame(move || {
                let _timer = remember(move || {
                    set_timeout(Duration::from_millis(40), move || fired.update(|n| *n += 1))
                });
            });
        }

        clock.advance(Duration::from_millis(39));
        assert_eq!(host.tick(), 0);
        clock.advance(Duration::from_millis(1));
        assert_eq!(host.tick(), 1);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_dropping_host_cancels_remembered_timers() {
        let clock = TestClock::new();
        set_clock(Box::new(clock.clone()));
        {
            let mut host = Host::new();
            host.frame(|| {
                let _timer = remember(|| set_timeout(Duration::from_millis(10), || {}));
            });
            assert_eq!(pending_timers(), 1);
        }
        assert_eq!(pending_timers(), 0);
    }
}
