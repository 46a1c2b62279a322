// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred, single-use query builders.
//!
//! A [`Table`] hands out one builder per verb. Builders accumulate
//! configuration and perform no I/O; the terminal `execute` consumes the
//! builder by value and issues exactly one HTTP request.

use std::fmt;

use reqwest::Method;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{RawResponse, RestClient};
use crate::error::StoreError;
use crate::filter::{CompareOp, Direction, Filter, PatternOp};
use crate::params::QueryParams;

const PREFER: &str = "prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

/// Handle on one table of the store.
#[derive(Debug, Clone)]
pub struct Table {
    client: RestClient,
    name: String,
}

impl Table {
    pub(crate) fn new(client: RestClient, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read rows. `columns` may embed relations, e.g. `"*, customers(name)"`.
    pub fn select(&self, columns: &str) -> SelectQuery {
        let mut params = QueryParams::new();
        params.set_select(columns);
        SelectQuery {
            target: self.clone(),
            params,
        }
    }

    /// Read rows with a pre-formatted filter fragment such as
    /// `"status=eq.Reservado"` or `"name=ilike.*x*&limit=10"`.
    ///
    /// The fragment's filters come before any chained filter. A `limit`,
    /// `order`, `offset` or `select` inside it is overridden by a later
    /// structured call for the same key.
    pub fn select_with(&self, columns: &str, raw_filter: &str) -> SelectQuery {
        self.select(columns).raw(raw_filter)
    }

    /// Create one row or many. The body is anything that serializes to a
    /// JSON object or array of objects.
    pub fn insert<T: Serialize + ?Sized>(&self, rows: &T) -> InsertQuery {
        InsertQuery {
            target: self.clone(),
            body: serde_json::to_value(rows),
        }
    }

    /// Modify rows matching the chained filters with the fields in `changes`.
    pub fn update<T: Serialize + ?Sized>(&self, changes: &T) -> UpdateQuery {
        UpdateQuery {
            target: self.clone(),
            body: serde_json::to_value(changes),
            params: QueryParams::new(),
        }
    }

    /// Remove rows matching the chained filters.
    pub fn delete(&self) -> DeleteQuery {
        DeleteQuery {
            target: self.clone(),
            params: QueryParams::new(),
        }
    }

    async fn send(
        &self,
        method: Method,
        params: &QueryParams,
        body: Option<&Value>,
        prefer: Option<&'static str>,
    ) -> Result<RawResponse, StoreError> {
        let url = self.client.table_url(&self.name, params)?;
        debug!(
            method = %method,
            table = %self.name,
            query = %params,
            "dispatching store request"
        );

        let mut request = self.client.request(method, url);
        if let Some(prefer) = prefer {
            request = request.header(PREFER, HeaderValue::from_static(prefer));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        self.client.dispatch(request, &self.name).await
    }
}

/// Row-predicate methods shared by every filterable builder.
///
/// Each call appends one filter; calls are ANDed by the store and rendered in
/// call order.
pub trait FilterBuilder: Sized {
    #[doc(hidden)]
    fn params_mut(&mut self) -> &mut QueryParams;

    fn filter(mut self, filter: Filter) -> Self {
        self.params_mut().push_filter(filter);
        self
    }

    /// `column=eq.value`
    fn eq(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(Filter::compare(column, CompareOp::Eq, value))
    }

    fn neq(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(Filter::compare(column, CompareOp::Neq, value))
    }

    fn gt(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(Filter::compare(column, CompareOp::Gt, value))
    }

    fn gte(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(Filter::compare(column, CompareOp::Gte, value))
    }

    fn lt(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(Filter::compare(column, CompareOp::Lt, value))
    }

    fn lte(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(Filter::compare(column, CompareOp::Lte, value))
    }

    /// Case-sensitive pattern match; `*` is the wildcard.
    fn like(self, column: &str, pattern: impl fmt::Display) -> Self {
        self.filter(Filter::pattern(column, PatternOp::Like, pattern))
    }

    /// Case-insensitive pattern match; `*` is the wildcard.
    fn ilike(self, column: &str, pattern: impl fmt::Display) -> Self {
        self.filter(Filter::pattern(column, PatternOp::ILike, pattern))
    }

    fn in_list<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        self.filter(Filter::in_list(column, values))
    }

    fn is_null(self, column: &str) -> Self {
        self.filter(Filter::IsNull {
            column: column.to_string(),
            negated: false,
        })
    }

    fn not_null(self, column: &str) -> Self {
        self.filter(Filter::IsNull {
            column: column.to_string(),
            negated: true,
        })
    }

    /// Escape hatch: a pre-formatted `k=v&k=v` fragment.
    fn raw(mut self, fragment: &str) -> Self {
        self.params_mut().push_raw(fragment);
        self
    }
}

/// A pending read.
#[derive(Debug)]
#[must_use = "queries do nothing until executed"]
pub struct SelectQuery {
    target: Table,
    params: QueryParams,
}

impl FilterBuilder for SelectQuery {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl SelectQuery {
    /// Sets the single sort key, replacing any earlier one.
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.params.set_order(column, direction);
        self
    }

    pub fn order_asc(self, column: &str) -> Self {
        self.order(column, Direction::Ascending)
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.order(column, Direction::Descending)
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.params.set_limit(count);
        self
    }

    pub fn offset(mut self, count: usize) -> Self {
        self.params.set_offset(count);
        self
    }

    /// Rows `from..=to` (zero-based, inclusive), as `offset`/`limit`.
    /// An inverted range (`to < from`) selects nothing.
    pub fn range(self, from: usize, to: usize) -> Self {
        let count = if to < from {
            0
        } else {
            (to - from).saturating_add(1)
        };
        self.offset(from).limit(count)
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Performs the GET and returns the rows as JSON values.
    pub async fn execute(self) -> Result<Vec<Value>, StoreError> {
        self.execute_as().await
    }

    /// Performs the GET and decodes every row as `T`.
    pub async fn execute_as<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let response = self
            .target
            .send(Method::GET, &self.params, None, None)
            .await?;
        decode(&response.body)
    }
}

/// A pending create that asks for no representation back.
#[derive(Debug)]
#[must_use = "queries do nothing until executed"]
pub struct InsertQuery {
    target: Table,
    body: Result<Value, serde_json::Error>,
}

impl InsertQuery {
    /// Ask the store to return the created rows, server-assigned fields included.
    pub fn returning(self) -> ReturningInsert {
        ReturningInsert {
            target: self.target,
            body: self.body,
            params: QueryParams::new(),
        }
    }

    /// Performs the POST with `Prefer: return=minimal`.
    pub async fn execute(self) -> Result<(), StoreError> {
        let body = self.body.map_err(|source| StoreError::Encode { source })?;
        self.target
            .send(
                Method::POST,
                &QueryParams::new(),
                Some(&body),
                Some(RETURN_MINIMAL),
            )
            .await?;
        Ok(())
    }
}

/// A pending create that returns the created rows.
#[derive(Debug)]
#[must_use = "queries do nothing until executed"]
pub struct ReturningInsert {
    target: Table,
    body: Result<Value, serde_json::Error>,
    params: QueryParams,
}

impl ReturningInsert {
    /// Restrict the returned columns.
    pub fn select(mut self, columns: &str) -> Self {
        self.params.set_select(columns);
        self
    }

    /// Performs the POST with `Prefer: return=representation`.
    pub async fn execute(self) -> Result<Vec<Value>, StoreError> {
        self.execute_as().await
    }

    pub async fn execute_as<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let body = self.body.map_err(|source| StoreError::Encode { source })?;
        let response = self
            .target
            .send(
                Method::POST,
                &self.params,
                Some(&body),
                Some(RETURN_REPRESENTATION),
            )
            .await?;
        decode(&response.body)
    }
}

/// A pending modification.
#[derive(Debug)]
#[must_use = "queries do nothing until executed"]
pub struct UpdateQuery {
    target: Table,
    body: Result<Value, serde_json::Error>,
    params: QueryParams,
}

impl FilterBuilder for UpdateQuery {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl UpdateQuery {
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Performs the PATCH and returns the updated rows.
    ///
    /// With no filters the request is sent unscoped and the store decides
    /// what that means; a warning is logged.
    pub async fn execute(self) -> Result<Vec<Value>, StoreError> {
        self.execute_as().await
    }

    pub async fn execute_as<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let body = self.body.map_err(|source| StoreError::Encode { source })?;
        if self.params.filter_count() == 0 {
            warn!(table = %self.target.name, "update has no filters and applies to every row");
        }
        let response = self
            .target
            .send(
                Method::PATCH,
                &self.params,
                Some(&body),
                Some(RETURN_REPRESENTATION),
            )
            .await?;
        decode(&response.body)
    }
}

/// A pending removal.
#[derive(Debug)]
#[must_use = "queries do nothing until executed"]
pub struct DeleteQuery {
    target: Table,
    params: QueryParams,
}

impl FilterBuilder for DeleteQuery {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl DeleteQuery {
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Performs the DELETE. `None` on a no-content success, otherwise the
    /// decoded body.
    pub async fn execute(self) -> Result<Option<Value>, StoreError> {
        if self.params.filter_count() == 0 {
            warn!(table = %self.target.name, "delete has no filters and applies to every row");
        }
        let response = self
            .target
            .send(Method::DELETE, &self.params, None, None)
            .await?;
        if response.status == reqwest::StatusCode::NO_CONTENT || response.body.trim().is_empty() {
            return Ok(None);
        }
        decode(&response.body).map(Some)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|source| StoreError::Decode { source })
}
