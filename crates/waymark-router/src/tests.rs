#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use waymark_core::Recomposer;

    use crate::error::HistoryError;
    use crate::history::{History, MemoryHistory, NavigateOptions};
    use crate::location::Location;
    use crate::query::QueryParams;
    use crate::query_param::{QueryParamSetter, use_query_param};
    use crate::router::Router;

    fn sort_validate(raw: Option<&str>) -> String {
        if raw == Some("desc") { "desc" } else { "asc" }.to_string()
    }

    fn sort_frame(
        rc: &mut Recomposer,
        router: &Router,
    ) -> (String, QueryParamSetter<String>) {
        let router = router.clone();
        rc.compose(move || use_query_param(&router, "sort", sort_validate))
    }

    #[test]
    fn test_query_params_parse_and_serialize() {
        let params = QueryParams::parse("?a=1&b=two%20words&a=3");
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("two words"));
        assert_eq!(params.get_all("a").collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(params.to_query_string(), "a=1&b=two+words&a=3");
    }

    #[test]
    fn test_query_params_set_replaces_first_in_place() {
        let mut params = QueryParams::parse("a=1&b=2&a=3");
        params.set("a", "9");
        assert_eq!(params.to_query_string(), "a=9&b=2");

        params.set("c", "5");
        assert_eq!(params.to_query_string(), "a=9&b=2&c=5");
    }

    #[test]
    fn test_query_params_remove_and_contains() {
        let mut params = QueryParams::parse("a=1&b=2&a=3");
        assert!(params.contains("a"));
        assert!(params.remove("a"));
        assert!(!params.contains("a"));
        assert!(!params.remove("a"));
        assert_eq!(params.to_query_string(), "b=2");
    }

    #[test]
    fn test_query_params_append_keeps_duplicates() {
        let mut params = QueryParams::parse("tag=a");
        params.append("tag", "b");
        params.append("sort", "asc");

        assert_eq!(params.get("tag"), Some("a"));
        assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(params.to_query_string(), "tag=a&tag=b&sort=asc");
    }

    #[test]
    fn test_query_params_value_roundtrip() {
        let mut params = QueryParams::new();
        params.set("q", "a&b=c d");
        let reparsed = QueryParams::parse(&params.to_query_string());
        assert_eq!(reparsed.get("q"), Some("a&b=c d"));
    }

    #[test]
    fn test_location_parse_and_target() {
        let loc = Location::parse("/items?sort=asc");
        assert_eq!(loc.path, "/items");
        assert_eq!(loc.query.get("sort"), Some("asc"));
        assert_eq!(loc.to_target(), "/items?sort=asc");

        let bare = Location::parse("/items");
        assert!(bare.query.is_empty());
        assert_eq!(bare.to_target(), "/items");
    }

    #[test]
    fn test_history_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/a");
        history.navigate("/b", NavigateOptions::default());
        history.navigate("/c", NavigateOptions::default());
        assert_eq!(history.len(), 3);

        assert!(history.back());
        assert_eq!(history.location().path, "/b");

        history.navigate("/d", NavigateOptions::default());
        assert_eq!(history.len(), 3);
        assert_eq!(history.location().path, "/d");
        assert!(!history.forward());
    }

    #[test]
    fn test_history_replace_keeps_length() {
        let history = MemoryHistory::new("/a");
        history.navigate(
            "/b",
            NavigateOptions {
                replace: true,
                scroll: false,
            },
        );
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().path, "/b");
        assert!(!history.back());
    }

    #[test]
    fn test_history_save_restore() {
        let history = MemoryHistory::new("/a?x=1");
        history.navigate("/b", NavigateOptions::default());
        assert!(history.back());
        let saved = history.save();

        let restored = MemoryHistory::new("/");
        restored.restore(&saved).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.location().to_target(), "/a?x=1");
        assert!(restored.forward());
        assert_eq!(restored.location().path, "/b");
    }

    #[test]
    fn test_history_restore_rejects_bad_input() {
        let history = MemoryHistory::new("/");

        assert!(matches!(
            history.restore("not json"),
            Err(HistoryError::Malformed(_))
        ));
        assert!(matches!(
            history.restore(r#"{"entries":[],"cursor":0}"#),
            Err(HistoryError::Empty)
        ));
        assert!(matches!(
            history.restore(r#"{"entries":["/a"],"cursor":3}"#),
            Err(HistoryError::CursorOutOfRange { cursor: 3, len: 1 })
        ));
        // Failed restores leave the stack alone.
        assert_eq!(history.location().path, "/");
    }

    // Missing parameter: the validator sees None, the default comes back,
    // and nothing navigates until a setter is called.
    #[test]
    fn test_default_when_param_absent() {
        let history = MemoryHistory::new("/items");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let saw_none = Rc::new(Cell::new(false));
        let (value, _set) = {
            let router = router.clone();
            let saw_none = saw_none.clone();
            rc.compose(move || {
                let saw_none = saw_none.clone();
                use_query_param(&router, "sort", move |raw| {
                    if raw.is_none() {
                        saw_none.set(true);
                    }
                    sort_validate(raw)
                })
            })
        };

        assert_eq!(value, "asc");
        assert!(saw_none.get());
        assert_eq!(history.navigations(), 0);
    }

    // /items?sort=asc, set("desc"): one navigation to /items?sort=desc,
    // replacing the entry without a scroll reset, and the value follows.
    #[test]
    fn test_set_navigates_once_and_value_follows() {
        let history = MemoryHistory::new("/items?sort=asc");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let (value, set_sort) = sort_frame(&mut rc, &router);
        assert_eq!(value, "asc");

        set_sort.set("desc".to_string());
        assert_eq!(history.navigations(), 1);
        assert_eq!(history.location().to_target(), "/items?sort=desc");
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.last_options(),
            Some(NavigateOptions {
                replace: true,
                scroll: false,
            })
        );

        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "desc");
    }

    // Idempotent write: a value whose string form already matches the live
    // URL touches neither the snapshot nor the history.
    #[test]
    fn test_set_is_idempotent_against_live_url() {
        let history = MemoryHistory::new("/items?sort=desc");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let (_, set_sort) = sort_frame(&mut rc, &router);

        let snapshot = set_sort.set("desc".to_string());
        assert_eq!(history.navigations(), 0);
        assert_eq!(snapshot, router.query());
    }

    // One-directional sync: an out-of-band URL change is authoritative.
    #[test]
    fn test_url_change_overwrites_state() {
        let history = MemoryHistory::new("/items?sort=asc");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "asc");

        // The host rewrote the address without going through a setter.
        history.navigate("/items?sort=desc", NavigateOptions::default());
        router.refresh();

        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "desc");
    }

    #[test]
    fn test_back_button_syncs_state() {
        let history = MemoryHistory::new("/items?sort=asc");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "asc");

        router.navigate("/items?sort=desc", NavigateOptions::default());
        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "desc");

        assert!(history.back());
        router.refresh();
        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "asc");
    }

    // A deferred write diverges state from the URL and stays divergent
    // across recompositions, until the URL itself moves.
    #[test]
    fn test_deferred_write_diverges_until_url_changes() {
        let history = MemoryHistory::new("/items?sort=asc");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let (_, set_sort) = sort_frame(&mut rc, &router);
        set_sort.set_with("desc".to_string(), false, None);

        // URL untouched, state pending.
        assert_eq!(history.navigations(), 0);
        assert_eq!(router.query().get("sort"), Some("asc"));
        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "desc");
        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "desc");

        // Once the raw value changes, the URL wins over the pending value.
        history.navigate("/items", NavigateOptions::default());
        router.refresh();
        let (value, _) = sort_frame(&mut rc, &router);
        assert_eq!(value, "asc");
    }

    fn two_param_frame(
        rc: &mut Recomposer,
        router: &Router,
    ) -> (
        (String, QueryParamSetter<String>),
        (String, QueryParamSetter<String>),
    ) {
        let router = router.clone();
        rc.compose(move || {
            let a = use_query_param(&router, "a", |raw| raw.unwrap_or("0").to_string());
            let b = use_query_param(&router, "b", |raw| raw.unwrap_or("0").to_string());
            (a, b)
        })
    }

    // Batching by threading the returned snapshot: exactly one navigation.
    #[test]
    fn test_batched_updates_navigate_once() {
        let history = MemoryHistory::new("/items?a=1&b=2");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let ((_, set_a), (_, set_b)) = two_param_frame(&mut rc, &router);

        let s1 = set_a.set_with("9".to_string(), false, None);
        set_b.set_with("8".to_string(), true, Some(s1));

        assert_eq!(history.navigations(), 1);
        assert_eq!(history.location().to_target(), "/items?a=9&b=8");

        let ((a, _), (b, _)) = two_param_frame(&mut rc, &router);
        assert_eq!(a, "9");
        assert_eq!(b, "8");
    }

    // Same batch through the explicit stage/commit surface.
    #[test]
    fn test_stage_and_commit_navigate_once() {
        let history = MemoryHistory::new("/items?a=1&b=2");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let ((_, set_a), (_, set_b)) = two_param_frame(&mut rc, &router);

        let params = set_a.stage("9".to_string(), router.query());
        let params = set_b.stage("8".to_string(), params);
        router.commit(params);

        assert_eq!(history.navigations(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().to_target(), "/items?a=9&b=8");
    }

    // Typed round trip: a numeric parameter survives URL and back.
    #[test]
    fn test_typed_param_roundtrip() {
        let history = MemoryHistory::new("/items");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let mut page_frame = |rc: &mut Recomposer| {
            let router = router.clone();
            rc.compose(move || {
                use_query_param(&router, "page", |raw| {
                    raw.and_then(|s| s.parse::<u32>().ok()).unwrap_or(1)
                })
            })
        };

        let (page, set_page) = page_frame(&mut rc);
        assert_eq!(page, 1);

        set_page.set(12);
        assert_eq!(history.location().to_target(), "/items?page=12");

        let (page, _) = page_frame(&mut rc);
        assert_eq!(page, 12);
    }

    // Validation is memoized on the raw value: recomposing for unrelated
    // reasons does not re-run the validator.
    #[test]
    fn test_validation_memoized_on_raw_value() {
        let history = MemoryHistory::new("/items?sort=asc");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut frame = |rc: &mut Recomposer| {
            let router = router.clone();
            let calls = calls.clone();
            rc.compose(move || {
                let calls = calls.clone();
                let (v, _) = use_query_param(&router, "sort", move |raw| {
                    calls.set(calls.get() + 1);
                    sort_validate(raw)
                });
                v
            })
        };

        frame(&mut rc);
        frame(&mut rc);
        frame(&mut rc);
        assert_eq!(calls.get(), 1);

        router.navigate("/items?sort=desc", NavigateOptions::default());
        let v = frame(&mut rc);
        assert_eq!(v, "desc");
        assert_eq!(calls.get(), 2);
    }

    // Setters that skip the snapshot thread still build from the live URL,
    // not from their render-time view of it.
    #[test]
    fn test_unthreaded_setters_read_live_url() {
        let history = MemoryHistory::new("/items?a=1&b=2");
        let router = Router::new(history.clone());
        let mut rc = Recomposer::new();

        let ((_, set_a), (_, set_b)) = two_param_frame(&mut rc, &router);

        set_a.set("9".to_string());
        // set_b was created when a=1, but must see a=9 now.
        set_b.set("8".to_string());

        assert_eq!(history.location().to_target(), "/items?a=9&b=8");
        assert_eq!(history.navigations(), 2);
    }
}
