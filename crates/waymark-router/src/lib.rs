//! # URL-synced state
//!
//! This crate keeps a piece of composition state consistent with one query
//! parameter of the current address, so the value survives back/forward
//! navigation and can be deep-linked, while still reading like ordinary
//! local state. The host side is a single seam, [`History`]: the current
//! [`Location`] and a navigate function. [`MemoryHistory`] is the in-process
//! implementation.
//!
//! The interesting entry point is [`use_query_param`]:
//!
//! ```rust
//! use waymark_core::Recomposer;
//! use waymark_router::{MemoryHistory, Router, use_query_param};
//!
//! let history = MemoryHistory::new("/items?page=3");
//! let router = Router::new(history.clone());
//! let mut rc = Recomposer::new();
//!
//! let (page, set_page) = rc.compose(|| {
//!     use_query_param(&router, "page", |raw| {
//!         raw.and_then(|s| s.parse::<u32>().ok()).unwrap_or(1)
//!     })
//! });
//! assert_eq!(page, 3);
//!
//! set_page.set(4);
//! assert_eq!(router.location().to_target(), "/items?page=4");
//! ```
//!
//! Multiple parameters batch into one navigation by staging through a
//! shared [`QueryParams`] snapshot and committing once:
//!
//! ```rust,ignore
//! let params = set_sort.stage(SortDir::Desc, router.query());
//! let params = set_page.stage(1, params);
//! router.commit(params);
//! ```

pub mod error;
pub mod history;
pub mod location;
pub mod query;
pub mod query_param;
pub mod router;
pub mod tests;

pub use error::*;
pub use history::*;
pub use location::*;
pub use query::*;
pub use query_param::*;
pub use router::*;
