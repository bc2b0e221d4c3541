use std::fmt;

use smallvec::SmallVec;

/// An ordered multimap snapshot of a query string.
///
/// Pairs keep their document order, so rewriting one parameter never
/// reshuffles the others. `set` follows `URLSearchParams.set`: the first
/// occurrence is replaced in place and any later duplicates are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: SmallVec<[(String, String); 4]>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (with or without a leading `?`).
    /// Form-urlencoded escapes are decoded; malformed escapes decode lossily
    /// rather than failing.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value under `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Replaces the first occurrence of `name` in place and drops the rest;
    /// appends if `name` is absent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let mut value = Some(value.into());
        self.pairs.retain(|pair| {
            if pair.0 == name {
                match value.take() {
                    Some(v) => {
                        pair.1 = v;
                        true
                    }
                    None => false,
                }
            } else {
                true
            }
        });
        if let Some(v) = value {
            self.pairs.push((name.to_string(), v));
        }
    }

    /// Appends without touching existing occurrences.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Removes every occurrence of `name`; returns whether any existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != name);
        self.pairs.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serializes to a form-urlencoded query string, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.iter() {
            ser.append_pair(k, v);
        }
        ser.finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
