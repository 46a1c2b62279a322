// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured filter expressions and their `column=operator.value` rendering.

use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }
}

/// Pattern-match operators. `*` is the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternOp {
    Like,
    ILike,
}

impl PatternOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternOp::Like => "like",
            PatternOp::ILike => "ilike",
        }
    }
}

/// Sort direction for `order=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// One row predicate. Multiple filters on a query are ANDed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// `column=op.value`
    Compare {
        column: String,
        op: CompareOp,
        value: String,
    },
    /// `column=like.pattern` / `column=ilike.pattern`
    Pattern {
        column: String,
        op: PatternOp,
        pattern: String,
    },
    /// `column=in.(a,b,c)`
    In { column: String, values: Vec<String> },
    /// `column=is.null` or `column=not.is.null`
    IsNull { column: String, negated: bool },
    /// A pre-formatted, already-encoded `key=value` pair sent as-is.
    Raw { key: String, value: String },
}

impl Filter {
    pub fn compare(column: &str, op: CompareOp, value: impl fmt::Display) -> Self {
        Filter::Compare {
            column: column.to_string(),
            op,
            value: value.to_string(),
        }
    }

    pub fn eq(column: &str, value: impl fmt::Display) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn pattern(column: &str, op: PatternOp, pattern: impl fmt::Display) -> Self {
        Filter::Pattern {
            column: column.to_string(),
            op,
            pattern: pattern.to_string(),
        }
    }

    pub fn in_list<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// The query parameter this filter renders to.
    pub fn to_param(&self) -> (String, String) {
        match self {
            Filter::Compare { column, op, value } => {
                (column.clone(), format!("{}.{value}", op.as_str()))
            }
            Filter::Pattern {
                column,
                op,
                pattern,
            } => (column.clone(), format!("{}.{pattern}", op.as_str())),
            Filter::In { column, values } => {
                let list = values
                    .iter()
                    .map(|v| quote_list_item(v))
                    .collect::<Vec<_>>()
                    .join(",");
                (column.clone(), format!("in.({list})"))
            }
            Filter::IsNull { column, negated } => {
                let value = if *negated { "not.is.null" } else { "is.null" };
                (column.clone(), value.to_string())
            }
            Filter::Raw { key, value } => (key.clone(), value.clone()),
        }
    }
}

/// Quote an `in.(...)` list item when it contains list syntax.
fn quote_list_item(value: &str) -> String {
    if value.contains([',', '(', ')', '"', '\\']) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Split a pre-formatted fragment such as `"name=ilike.*x*&limit=10"` into pairs.
///
/// Empty segments are dropped. A segment without `=` becomes a key with an
/// empty value.
pub fn parse_raw(fragment: &str) -> Vec<(String, String)> {
    fragment
        .trim_start_matches(['?', '&'])
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (segment.to_string(), String::new()),
        })
        .collect()
}
