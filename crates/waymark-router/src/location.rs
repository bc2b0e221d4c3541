use std::fmt;

use crate::query::QueryParams;

/// A path plus its parsed query string. The navigable part of an address;
/// scheme, host, and fragment are out of scope here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: QueryParams,
}

impl Location {
    /// Splits a target like `/items?sort=asc` into path and query.
    pub fn parse(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: QueryParams::parse(query),
            },
            None => Self {
                path: target.to_string(),
                query: QueryParams::new(),
            },
        }
    }

    /// Same path, different query.
    pub fn with_query(&self, query: QueryParams) -> Self {
        Self {
            path: self.path.clone(),
            query,
        }
    }

    /// Re-serializes as a navigation target. The `?` is omitted when the
    /// query is empty.
    pub fn to_target(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_query_string())
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_target())
    }
}
