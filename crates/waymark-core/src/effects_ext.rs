use std::cell::RefCell;

use crate::effects::{Dispose, on_unmount};
use crate::remember;

/// Per-callsite effect that re-runs only when `key` changes.
///
/// The previous key lives in an order-based remember slot, so each call site
/// (in a stable composition order) tracks its own key independently. The
/// first composition counts as a change.
pub fn keyed_effect<K: PartialEq + 'static>(key: K, run: impl FnOnce()) {
    keyed_effect_with_cleanup(key, move || {
        run();
        Dispose::empty()
    });
}

/// Like [`keyed_effect`], but `run` returns a cleanup. The cleanup runs
/// before the effect re-runs for a new key, and at unmount through the
/// owning scope.
pub fn keyed_effect_with_cleanup<K: PartialEq + 'static>(key: K, run: impl FnOnce() -> Dispose) {
    let slot = remember(|| {
        let cleanup = Dispose::empty();
        on_unmount({
            let cleanup = cleanup.clone();
            move || cleanup.run()
        });
        RefCell::new((None::<K>, cleanup))
    });

    let mut state = slot.borrow_mut();
    if state.0.as_ref() != Some(&key) {
        state.0 = Some(key);
        let cleanup = state.1.clone();
        drop(state);
        // Prior cleanup runs before the new effect body.
        cleanup.run();
        cleanup.adopt(run());
    }
}

/// Runs on every recomposition.
pub fn side_effect(effect: impl Fn()) {
    effect();
}
