use std::cell::RefCell;
use std::rc::Rc;

/// A replaceable cleanup cell. The current closure runs at most once; clones
/// share the cell, so whichever holder runs it first wins.
#[derive(Clone, Default)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// A cell with nothing to run yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes and runs the current cleanup, if any.
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    /// Runs the current cleanup, then moves `next`'s closure into this cell.
    /// `next` is left empty, so a scope holding this cell keeps owning the
    /// live cleanup.
    pub fn adopt(&self, next: Dispose) {
        let f = next.0.borrow_mut().take();
        self.run();
        *self.0.borrow_mut() = f;
    }
}

/// Registers `f` to run when the current scope is disposed. The returned
/// guard shares the cell, so callers can run or swap the cleanup early and
/// the scope's teardown finds it already spent.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    let d = Dispose::new(f);
    if let Some(scope) = crate::scope::current_scope() {
        let d2 = d.clone();
        scope.add_disposer(move || d2.run());
    }
    d
}
