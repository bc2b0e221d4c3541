use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static INVALIDATED: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current composition output as stale. Called on every signal
/// write; hosts may also call it for external events.
pub fn invalidate() {
    INVALIDATED.with(|flag| flag.set(true));
}

fn take_invalidation() -> bool {
    INVALIDATED.with(|flag| flag.replace(false))
}

/// Slot storage for one composition. Order-based slots are addressed by a
/// cursor that resets each pass; keyed slots survive conditional branches.
#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
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

/// Upper bound on compose passes per frame. A composition that writes a
/// signal on every pass would otherwise never settle.
const MAX_PASSES: usize = 8;

/// Drives compose-until-settled frames for one composition.
///
/// Each `Recomposer` owns its slot storage (swapped into the thread-local
/// while a pass runs, so independent recomposers never share slots) and a
/// root [`Scope`] that lives until the recomposer is torn down. A frame
/// re-runs the compose closure while any signal was written during the pass.
pub struct Recomposer {
    composer: Composer,
    root: Scope,
    passes: u64,
}

impl Recomposer {
    pub fn new() -> Self {
        Self {
            composer: Composer::default(),
            root: Scope::new(),
            passes: 0,
        }
    }

    /// Runs one frame: composes, then recomposes until the pass leaves every
    /// signal untouched (or the pass cap is hit).
    pub fn compose<R>(&mut self, mut f: impl FnMut() -> R) -> R {
        // Invalidation raised between frames is satisfied by this frame.
        let _ = take_invalidation();

        let mut result = self.run_pass(&mut f);
        let mut frame_passes = 1;
        while take_invalidation() {
            if frame_passes == MAX_PASSES {
                log::warn!("composition did not settle after {MAX_PASSES} passes; giving up");
                break;
            }
            result = self.run_pass(&mut f);
            frame_passes += 1;
        }
        result
    }

    fn run_pass<R>(&mut self, f: &mut impl FnMut() -> R) -> R {
        self.composer.cursor = 0;
        COMPOSER.with(|c| std::mem::swap(&mut *c.borrow_mut(), &mut self.composer));
        let result = self.root.run(|| f());
        COMPOSER.with(|c| std::mem::swap(&mut *c.borrow_mut(), &mut self.composer));
        self.passes += 1;
        result
    }

    /// Total passes run so far, across all frames.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Disposes the root scope, running every registered cleanup.
    pub fn teardown(self) {
        self.root.clone().dispose();
    }
}

impl Default for Recomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Recomposer {
    fn drop(&mut self) {
        self.root.clone().dispose();
    }
}
