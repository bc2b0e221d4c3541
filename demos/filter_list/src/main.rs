//! Headless list page whose sort order and page number live in the URL.
//!
//! Run with `RUST_LOG=debug` to watch navigations and recompositions.

use std::fmt;

use waymark_core::{Recomposer, side_effect};
use waymark_router::{
    MemoryHistory, NavigateOptions, QueryParamSetter, Router, use_query_param,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SortDir {
    Asc,
    Desc,
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        })
    }
}

fn parse_sort(raw: Option<&str>) -> SortDir {
    match raw {
        Some("desc") => SortDir::Desc,
        _ => SortDir::Asc,
    }
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(1)
}

const ITEMS: &[&str] = &["anchor", "buoy", "compass", "dinghy", "ensign", "fathom"];
const PAGE_SIZE: usize = 2;

fn render(sort: SortDir, page: u32, target: &str) {
    let mut items: Vec<&str> = ITEMS.to_vec();
    if sort == SortDir::Desc {
        items.reverse();
    }
    let start = (page.saturating_sub(1) as usize) * PAGE_SIZE;
    let shown: Vec<&str> = items.iter().skip(start).take(PAGE_SIZE).copied().collect();
    println!("{target:30} page {page} ({sort}): {}", shown.join(", "));
}

fn main() {
    env_logger::init();

    let history = MemoryHistory::new("/items?sort=desc");
    let router = Router::new(history.clone());
    router
        .changes()
        .subscribe(|v| log::debug!("router mutation #{v}"));

    let mut rc = Recomposer::new();
    let mut frame = |rc: &mut Recomposer| -> (QueryParamSetter<SortDir>, QueryParamSetter<u32>) {
        let router = router.clone();
        rc.compose(move || {
            side_effect(|| log::debug!("composing /items"));
            let (sort, set_sort) = use_query_param(&router, "sort", parse_sort);
            let (page, set_page) = use_query_param(&router, "page", parse_page);
            render(sort, page, &router.location().to_target());
            (set_sort, set_page)
        })
    };

    let (set_sort, set_page) = frame(&mut rc);

    log::info!("flip sort with a single setter call");
    set_sort.set(SortDir::Asc);
    frame(&mut rc);

    log::info!("batch sort + page into one navigation");
    let params = set_sort.stage(SortDir::Desc, router.query());
    let params = set_page.stage(3, params);
    router.commit(params);
    frame(&mut rc);

    log::info!("deep-link to another page, then walk back");
    router.navigate("/items?sort=asc&page=2", NavigateOptions::default());
    frame(&mut rc);

    if history.back() {
        router.refresh();
    }
    frame(&mut rc);

    println!("saved history: {}", history.save());
}
