use std::fmt::Display;

use waymark_core::{Signal, keyed_effect, remember, remember_state, signal};

use crate::history::NavigateOptions;
use crate::query::QueryParams;
use crate::router::Router;

/// Write half of [`use_query_param`].
///
/// Updates the in-memory value and, unless deferred, rewrites the URL. Every
/// call reads the live query string (or a snapshot threaded through from an
/// earlier call), so independent setters in the same tick do not clobber
/// each other's parameters.
#[derive(Clone)]
pub struct QueryParamSetter<T: Clone + Display + 'static> {
    router: Router,
    key: String,
    value: Signal<T>,
}

impl<T: Clone + Display + 'static> QueryParamSetter<T> {
    /// Sets the value and rewrites the URL in one step.
    pub fn set(&self, new_value: T) -> QueryParams {
        self.set_with(new_value, true, None)
    }

    /// Accumulates into `params` without navigating. Thread the result into
    /// the next setter, then issue one [`Router::commit`] for the batch.
    pub fn stage(&self, new_value: T, params: QueryParams) -> QueryParams {
        self.set_with(new_value, false, Some(params))
    }

    /// Full-control form.
    ///
    /// Builds on `prev` if given, otherwise on a snapshot of the live query
    /// string. When the value's string form already matches the live URL,
    /// nothing changes: no state write, no snapshot edit, no navigation.
    /// With `update_url`, navigates to the current path plus the updated
    /// snapshot, replacing the history entry and leaving scroll alone.
    /// Returns the snapshot either way so updates can be chained.
    pub fn set_with(&self, new_value: T, update_url: bool, prev: Option<QueryParams>) -> QueryParams {
        let new_str = new_value.to_string();
        let live = self.router.location();
        let mut params = prev.unwrap_or_else(|| live.query.clone());

        if live.query.get(&self.key) != Some(new_str.as_str()) {
            self.value.set(new_value);
            params.set(&self.key, new_str);
            if update_url {
                let target = live.with_query(params.clone()).to_target();
                self.router.navigate(
                    &target,
                    NavigateOptions {
                        replace: true,
                        scroll: false,
                    },
                );
            }
        }

        params
    }
}

/// Local state mirrored into one query parameter.
///
/// Behaves like a plain remembered value for the composition that owns it,
/// but the named parameter of the current URL is the durable copy: the value
/// is (re)derived from the URL whenever the URL-side raw string changes, so
/// back/forward navigation and hand-edited addresses win over stale state.
/// Writes go through the returned [`QueryParamSetter`].
///
/// `validate` maps the raw string (or its absence) to a typed value. It must
/// be total: for missing or malformed input it returns a concrete default,
/// never panics. It also must round-trip with `Display` closely enough that
/// `validate(v.to_string()).to_string() == v.to_string()`, since change
/// detection compares string forms. Validation is memoized on the raw value;
/// re-composing for unrelated reasons does not re-run it. The validator for
/// a given call site is expected to stay the same across frames.
///
/// Must be called during composition, in a stable order, like any
/// order-based `remember`.
///
/// ```rust
/// use waymark_core::Recomposer;
/// use waymark_router::{MemoryHistory, Router, use_query_param};
///
/// let router = Router::new(MemoryHistory::new("/items?sort=desc"));
/// let mut rc = Recomposer::new();
/// let sort = rc.compose(|| {
///     let (sort, _set_sort) = use_query_param(&router, "sort", |raw| {
///         if raw == Some("desc") { "desc" } else { "asc" }.to_string()
///     });
///     sort
/// });
/// assert_eq!(sort, "desc");
/// ```
pub fn use_query_param<T, V>(router: &Router, key: &str, validate: V) -> (T, QueryParamSetter<T>)
where
    T: Clone + Display + 'static,
    V: Fn(Option<&str>) -> T,
{
    let raw = router.query().get(key).map(str::to_string);

    // Validation result, memoized on the raw value.
    let memo = remember_state(|| None::<(Option<String>, T)>);
    let query_value = {
        let mut m = memo.borrow_mut();
        match m.as_ref() {
            Some((last_raw, cached)) if *last_raw == raw => cached.clone(),
            _ => {
                let v = validate(raw.as_deref());
                *m = Some((raw.clone(), v.clone()));
                v
            }
        }
    };

    let value = remember(|| signal(query_value.clone()));

    // One-way sync from URL to state. Fires only when the raw value for
    // `key` changes; a deferred write may diverge from the URL until then.
    {
        let value = value.clone();
        let query_value = query_value.clone();
        keyed_effect(raw, move || {
            let value_str = value.get().to_string();
            if query_value.to_string() != value_str {
                value.set(query_value);
            }
        });
    }

    let setter = QueryParamSetter {
        router: router.clone(),
        key: key.to_string(),
        value: (*value).clone(),
    };

    (setter.value.get(), setter)
}
