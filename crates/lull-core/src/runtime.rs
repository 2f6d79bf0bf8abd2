use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;
use crate::timer;

thread_local! {
    static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static VIEWPORT: Cell<Option<Viewport>> = const { Cell::new(None) };
}

/// Size of the surface a host renders into, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// Viewport of the host currently composing, if any.
pub fn current_viewport() -> Option<Viewport> {
    VIEWPORT.with(|v| v.get())
}

#[derive(Default)]
pub struct Composer {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
    keyed_slots: HashMap<String, Box<dyn Any>>,
}

impl Composer {
    pub fn slot_count(&self) -> usize {
        self.slots.len() + self.keyed_slots.len()
    }
}

/// Installs a host's composer and viewport for one pass and puts the previous
/// ones back, also on unwind.
struct ComposeGuard {
    prev: Option<Composer>,
    prev_viewport: Option<Viewport>,
}

impl ComposeGuard {
    fn begin(mut composer: Composer, viewport: Viewport) -> Self {
        composer.cursor = 0;
        let prev = COMPOSER.with(|c| std::mem::replace(&mut *c.borrow_mut(), composer));
        let prev_viewport = VIEWPORT.with(|v| v.replace(Some(viewport)));
        ComposeGuard {
            prev: Some(prev),
            prev_viewport,
        }
    }

    fn finish(mut self) -> Composer {
        let prev = self.prev.take().unwrap_or_default();
        VIEWPORT.with(|v| v.set(self.prev_viewport));
        COMPOSER.with(|c| std::mem::replace(&mut *c.borrow_mut(), prev))
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            let _ = COMPOSER.try_with(|c| *c.borrow_mut() = prev);
            let _ = VIEWPORT.try_with(|v| v.set(self.prev_viewport));
        }
    }
}

/// Owns the remembered state and root scope of one mounted UI tree.
///
/// A platform runner calls [`Host::frame`] to compose, [`Host::tick`] to fire
/// due timers, and [`Host::unmount`] (or drops the host) to tear everything
/// down. Hooks register their cleanup on the root scope, so unmounting cancels
/// every timer they own.
pub struct Host {
    composer: Composer,
    scope: Scope,
    viewport: Viewport,
    frames: u64,
}

impl Host {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::default())
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            composer: Composer::default(),
            scope: Scope::new(),
            viewport,
            frames: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of remembered slots (positional and keyed).
    pub fn slot_count(&self) -> usize {
        self.composer.slot_count()
    }

    pub fn is_mounted(&self) -> bool {
        !self.scope.is_disposed()
    }

    /// Run one composition pass.
    pub fn frame<R>(&mut self, build: impl FnOnce() -> R) -> R {
        if !self.is_mounted() {
            log::warn!("Host::frame called after unmount; hooks will not schedule work");
        }
        let guard = ComposeGuard::begin(std::mem::take(&mut self.composer), self.viewport);
        let result = self.scope.run(build);
        self.composer = guard.finish();
        self.frames += 1;
        result
    }

    /// Fire due timers. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        timer::run_due_timers()
    }

    /// Tear down the tree: runs every registered disposer exactly once.
    pub fn unmount(&mut self) {
        if self.is_mounted() {
            log::debug!("Host: unmounting after {} frame(s)", self.frames);
            self.scope.dispose();
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let (cursor, existing) = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;
        let existing = c
            .slots
            .get(cursor)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned());
        (cursor, existing)
    });

    match existing {
        Some(Some(rc)) => rc,
        other => {
            if other.is_some() {
                log::warn!(
                    "remember: slot {} type changed; replacing. \
                     If this is due to conditional composition, prefer remember_with_key.",
                    cursor
                );
            }
            // init may register effects; run it unborrowed.
            let rc: Rc<T> = Rc::new(init());
            COMPOSER.with(|c| {
                let mut c = c.borrow_mut();
                if cursor < c.slots.len() {
                    c.slots[cursor] = Box::new(rc.clone());
                } else {
                    c.slots.push(Box::new(rc.clone()));
                }
            });
            rc
        }
    }
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let existing = COMPOSER.with(|c| {
        c.borrow()
            .keyed_slots
            .get(&key)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned())
    });

    match existing {
        Some(Some(rc)) => rc,
        other => {
            if other.is_some() {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
            let rc: Rc<T> = Rc::new(init());
            COMPOSER.with(|c| {
                c.borrow_mut().keyed_slots.insert(key, Box::new(rc.clone()));
            });
            rc
        }
    }
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}
