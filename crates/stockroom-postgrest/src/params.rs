// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical query-string assembly.
//!
//! All parameter sources (column projection, structured filters, raw
//! fragments, order, limit, offset) land in one [`QueryParams`] and are
//! rendered in a single pass:
//!
//! `select` → filters in call order → `order` → `limit` → `offset`
//!
//! Filter keys may repeat (the store ANDs them). The modifier keys `select`,
//! `order`, `limit` and `offset` appear at most once: a later value replaces
//! an earlier one, whether it came from a structured call or a raw fragment.
//!
//! Values from structured calls are percent-encoded on the way out. Raw
//! fragments are taken to be encoded already and go on the wire untouched.

use std::fmt;

use url::form_urlencoded::byte_serialize;

use crate::filter::{Direction, Filter, parse_raw};

/// Value of a singleton modifier and whether it arrived pre-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Modifier {
    value: String,
    verbatim: bool,
}

impl Modifier {
    fn structured(value: String) -> Option<Self> {
        Some(Self {
            value,
            verbatim: false,
        })
    }

    fn verbatim(value: String) -> Option<Self> {
        Some(Self {
            value,
            verbatim: true,
        })
    }
}

/// Accumulated parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    select: Option<Modifier>,
    filters: Vec<Filter>,
    order: Option<Modifier>,
    limit: Option<Modifier>,
    offset: Option<Modifier>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column projection. Whitespace outside double quotes is dropped,
    /// so `"*, customers(name)"` renders as `*,customers(name)`.
    pub fn set_select(&mut self, columns: &str) {
        self.select = Modifier::structured(compact_columns(columns));
    }

    pub fn push_filter(&mut self, filter: Filter) {
        match filter {
            Filter::Raw { key, value } => self.push_pair(key, value),
            other => self.filters.push(other),
        }
    }

    /// Append a pre-formatted, already-encoded fragment; modifier keys inside
    /// it go to their slot.
    pub fn push_raw(&mut self, fragment: &str) {
        for (key, value) in parse_raw(fragment) {
            self.push_pair(key, value);
        }
    }

    fn push_pair(&mut self, key: String, value: String) {
        match key.as_str() {
            "select" => self.select = Modifier::verbatim(value),
            "order" => self.order = Modifier::verbatim(value),
            "limit" => self.limit = Modifier::verbatim(value),
            "offset" => self.offset = Modifier::verbatim(value),
            _ => self.filters.push(Filter::Raw { key, value }),
        }
    }

    pub fn set_order(&mut self, column: &str, direction: Direction) {
        self.order = Modifier::structured(format!("{column}.{}", direction.as_str()));
    }

    pub fn set_limit(&mut self, count: usize) {
        self.limit = Modifier::structured(count.to_string());
    }

    pub fn set_offset(&mut self, count: usize) {
        self.offset = Modifier::structured(count.to_string());
    }

    /// Number of row predicates (structured and raw). Modifiers are not counted.
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_none()
            && self.filters.is_empty()
            && self.order.is_none()
            && self.limit.is_none()
            && self.offset.is_none()
    }

    /// Parameters in canonical order as given, with no encoding applied.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries()
            .into_iter()
            .map(|(key, value, _)| (key, value))
            .collect()
    }

    /// Wire form of the query. Structured keys and values are
    /// form-urlencoded; raw pairs are copied byte for byte.
    pub fn query_string(&self) -> String {
        self.entries()
            .into_iter()
            .map(|(key, value, verbatim)| {
                if verbatim {
                    format!("{key}={value}")
                } else {
                    format!("{}={}", encode(&key), encode(&value))
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `(key, value, verbatim)` in canonical order.
    fn entries(&self) -> Vec<(String, String, bool)> {
        let slot = |key: &str, modifier: &Option<Modifier>| {
            modifier
                .as_ref()
                .map(|m| (key.to_string(), m.value.clone(), m.verbatim))
        };
        let mut entries = Vec::with_capacity(self.filters.len() + 4);
        entries.extend(slot("select", &self.select));
        entries.extend(self.filters.iter().map(|filter| {
            let (key, value) = filter.to_param();
            (key, value, matches!(filter, Filter::Raw { .. }))
        }));
        entries.extend(slot("order", &self.order));
        entries.extend(slot("limit", &self.limit));
        entries.extend(slot("offset", &self.offset));
        entries
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

/// Unencoded `k=v&k=v` form, used for logs and assertions.
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs().iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

fn compact_columns(columns: &str) -> String {
    let mut quoted = false;
    columns
        .chars()
        .filter(|c| {
            if *c == '"' {
                quoted = !quoted;
            }
            quoted || !c.is_whitespace()
        })
        .collect()
}
