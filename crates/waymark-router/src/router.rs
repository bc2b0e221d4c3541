use std::rc::Rc;

use waymark_core::{Signal, signal};

use crate::history::{History, NavigateOptions};
use crate::location::Location;
use crate::query::QueryParams;

/// Clone-able handle pairing a [`History`] with the reactive graph.
///
/// Every mutation that goes through the router bumps a version signal, which
/// invalidates the current composition; a composition that reads the
/// location therefore re-runs after navigation, back/forward included. A
/// `History` mutated behind the router's back will not wake anything up.
#[derive(Clone)]
pub struct Router {
    history: Rc<dyn History>,
    version: Signal<u64>,
}

impl Router {
    pub fn new(history: impl History + 'static) -> Self {
        Self {
            history: Rc::new(history),
            version: signal(0),
        }
    }

    pub fn location(&self) -> Location {
        self.history.location()
    }

    /// Current path component, query excluded.
    pub fn path(&self) -> String {
        self.history.location().path
    }

    /// Snapshot of the current query parameters.
    pub fn query(&self) -> QueryParams {
        self.history.location().query
    }

    pub fn navigate(&self, target: &str, options: NavigateOptions) {
        self.history.navigate(target, options);
        self.bump();
    }

    /// Tells the router the URL changed out of band (the host moved through
    /// history, or rewrote the address directly), so compositions re-run
    /// and read the new location.
    pub fn refresh(&self) {
        self.bump();
    }

    /// A signal that changes after every router-driven mutation. Subscribe
    /// to observe navigations; composition re-runs happen regardless.
    pub fn changes(&self) -> Signal<u64> {
        self.version.clone()
    }

    /// Issues the single navigation for a batch of staged parameter
    /// updates: current path, `params` as the query, replace, no scroll.
    pub fn commit(&self, params: QueryParams) {
        let target = self.location().with_query(params).to_target();
        self.navigate(
            &target,
            NavigateOptions {
                replace: true,
                scroll: false,
            },
        );
    }

    fn bump(&self) {
        self.version.update(|v| *v = v.wrapping_add(1));
    }
}
