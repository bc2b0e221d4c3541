//! # Signals, slots, and settled frames
//!
//! Waymark's runtime is a headless slice of a composition system: enough to
//! host state that must be recomputed when something external (like the
//! current URL) changes, without any widget tree attached. Three pieces:
//!
//! - `Signal<T>` — observable, reactive value. Every write flags the runtime
//!   so the next frame knows the previous output is stale.
//! - `remember*` — slot storage bound to the composition.
//! - `keyed_effect` / `keyed_effect_with_cleanup` / `on_unmount` —
//!   side-effects with explicit dependency keys and scope-bound cleanup.
//!
//! ## Signals
//!
//! ```rust
//! use waymark_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Remembered state and frames
//!
//! A [`Recomposer`] runs a compose closure and repeats it until a pass
//! writes no signal, so state mutated mid-pass (for example by a sync
//! effect) is visible in the frame's final output:
//!
//! ```rust
//! use waymark_core::*;
//!
//! let mut rc = Recomposer::new();
//! let out = rc.compose(|| {
//!     let count = remember(|| signal(0));
//!     keyed_effect((), || count.set(41));
//!     count.get() + 1
//! });
//! assert_eq!(out, 42);
//! ```
//!
//! - `remember` and `remember_state` are order-based: the Nth call in a
//!   pass always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key-based and
//!   stable across conditional branches.
//!
//! ## Effects and cleanup
//!
//! `keyed_effect` re-runs only when its key changes, which is the explicit
//! form of a dependency-keyed effect; `keyed_effect_with_cleanup` holds the
//! effect's cleanup in a [`Dispose`] cell, running it before the next key's
//! body and at unmount. `on_unmount` registers a plain cleanup with the
//! current scope. Cleanups registered during composition run when the
//! recomposer is torn down.

pub mod effects;
pub mod effects_ext;
pub mod runtime;
pub mod scope;
pub mod signal;

pub use effects::*;
pub use effects_ext::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
