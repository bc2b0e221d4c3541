use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::location::Location;

/// Options for one navigation.
///
/// `replace` swaps the current entry instead of pushing a new one; `scroll`
/// is whether the host should reset scroll position afterwards. The store's
/// own navigations use `{ replace: true, scroll: false }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigateOptions {
    pub replace: bool,
    pub scroll: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            replace: false,
            scroll: true,
        }
    }
}

/// The host navigation seam: where we are, and how to go somewhere else.
/// Everything else in this crate is written against this trait.
pub trait History {
    fn location(&self) -> Location;
    fn navigate(&self, target: &str, options: NavigateOptions);
}

struct Stack {
    entries: Vec<Location>,
    cursor: usize,
    navigations: u64,
    last_options: Option<NavigateOptions>,
}

/// In-process history: an entry stack with a cursor.
///
/// Pushing truncates any forward entries first, the way a browser does;
/// `back`/`forward` only move the cursor. Navigation count and last options
/// are recorded so callers can assert on redundant-navigation behavior.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<Stack>>,
}

#[derive(Serialize, Deserialize)]
struct SavedHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Stack {
                entries: vec![Location::parse(initial)],
                cursor: 0,
                navigations: 0,
                last_options: None,
            })),
        }
    }

    /// Moves the cursor one entry back; reports whether it moved.
    pub fn back(&self) -> bool {
        let mut s = self.inner.borrow_mut();
        if s.cursor == 0 {
            return false;
        }
        s.cursor -= 1;
        true
    }

    /// Moves the cursor one entry forward; reports whether it moved.
    pub fn forward(&self) -> bool {
        let mut s = self.inner.borrow_mut();
        if s.cursor + 1 >= s.entries.len() {
            return false;
        }
        s.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Always false in practice: `new` seeds one entry and `restore` rejects
    /// empty stacks. Kept alongside `len` for the usual pairing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many `navigate` calls this history has seen.
    pub fn navigations(&self) -> u64 {
        self.inner.borrow().navigations
    }

    /// Options of the most recent `navigate` call, if any.
    pub fn last_options(&self) -> Option<NavigateOptions> {
        self.inner.borrow().last_options
    }

    /// Serializes entries and cursor to JSON.
    pub fn save(&self) -> String {
        let s = self.inner.borrow();
        let saved = SavedHistory {
            entries: s.entries.iter().map(Location::to_target).collect(),
            cursor: s.cursor,
        };
        serde_json::to_string(&saved).unwrap_or_else(|_| "{}".into())
    }

    /// Replaces the stack with a previously saved one.
    pub fn restore(&self, json: &str) -> Result<(), HistoryError> {
        let saved: SavedHistory = serde_json::from_str(json)?;
        if saved.entries.is_empty() {
            return Err(HistoryError::Empty);
        }
        if saved.cursor >= saved.entries.len() {
            return Err(HistoryError::CursorOutOfRange {
                cursor: saved.cursor,
                len: saved.entries.len(),
            });
        }

        let mut s = self.inner.borrow_mut();
        s.entries = saved.entries.iter().map(|t| Location::parse(t)).collect();
        s.cursor = saved.cursor;
        Ok(())
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let s = self.inner.borrow();
        s.entries[s.cursor].clone()
    }

    fn navigate(&self, target: &str, options: NavigateOptions) {
        log::debug!(
            "navigate to {target} (replace: {}, scroll: {})",
            options.replace,
            options.scroll
        );
        let mut s = self.inner.borrow_mut();
        let location = Location::parse(target);
        if options.replace {
            let cursor = s.cursor;
            s.entries[cursor] = location;
        } else {
            let cursor = s.cursor;
            s.entries.truncate(cursor + 1);
            s.entries.push(location);
            s.cursor += 1;
        }
        s.navigations += 1;
        s.last_options = Some(options);
    }
}
