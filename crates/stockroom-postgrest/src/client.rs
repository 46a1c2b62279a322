// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a PostgREST-style tabular store.
//!
//! Provides [`RestClient`] which owns the connection pool, the credential
//! headers, and the request timeout. Table and bucket handles borrow nothing
//! from the caller; each holds a cheap clone of the client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use tracing::debug;

use stockroom_config::model::StoreConfig;
use stockroom_core::StockroomError;

use crate::bucket::Bucket;
use crate::error::StoreError;
use crate::params::QueryParams;
use crate::query::Table;

/// Header carrying the project API key.
const APIKEY_HEADER: &str = "apikey";

/// Client for one store deployment.
#[derive(Debug, Clone)]
pub struct RestClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
    rest_base: String,
    storage_base: String,
}

/// A successful response: status plus the body read to completion.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RestClient {
    /// Builds a client from the `[store]` section.
    ///
    /// `apikey` and `Authorization: Bearer` are attached to every request and
    /// marked sensitive so they never show up in debug output.
    pub fn new(config: &StoreConfig) -> Result<Self, StockroomError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            headers.insert(
                HeaderName::from_static(APIKEY_HEADER),
                sensitive_value(key, "API key")?,
            );
        }
        if let Some(token) = config.effective_bearer() {
            headers.insert(
                AUTHORIZATION,
                sensitive_value(&format!("Bearer {token}"), "bearer token")?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StockroomError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| StockroomError::Config(format!("invalid store url '{base_url}': {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                rest_base: join_path(&base_url, &config.rest_path),
                storage_base: join_path(&base_url, &config.storage_path),
                base_url,
                http,
            }),
        })
    }

    /// Builds a client against `url` with default paths and no credentials.
    pub fn with_base_url(url: &str) -> Result<Self, StockroomError> {
        Self::new(&StoreConfig {
            url: url.to_string(),
            ..StoreConfig::default()
        })
    }

    /// Handle on one table. No I/O happens until a query is executed.
    pub fn table(&self, name: &str) -> Table {
        Table::new(self.clone(), name)
    }

    /// Handle on one object-storage bucket.
    pub fn bucket(&self, name: &str) -> Bucket {
        Bucket::new(self.clone(), name)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Table endpoint prefix, e.g. `http://host/rest/v1`.
    pub fn rest_base(&self) -> &str {
        &self.inner.rest_base
    }

    /// Object-storage prefix, e.g. `http://host/storage/v1`.
    pub fn storage_base(&self) -> &str {
        &self.inner.storage_base
    }

    /// Full request URL for `table` with `params` appended in canonical order.
    pub(crate) fn table_url(&self, table: &str, params: &QueryParams) -> Result<Url, StoreError> {
        let raw = format!("{}/{}", self.inner.rest_base, table);
        let mut url = Url::parse(&raw).map_err(|e| StoreError::InvalidUrl(format!("{raw}: {e}")))?;
        if !params.is_empty() {
            url.set_query(Some(&params.query_string()));
        }
        Ok(url)
    }

    pub(crate) fn parse_url(raw: &str) -> Result<Url, StoreError> {
        Url::parse(raw).map_err(|e| StoreError::InvalidUrl(format!("{raw}: {e}")))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.http.request(method, url)
    }

    /// Sends one request. Non-2xx statuses become [`StoreError::Store`] with
    /// the body kept verbatim. Nothing is retried.
    pub(crate) async fn dispatch(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<RawResponse, StoreError> {
        let response = request.send().await.map_err(StoreError::transport)?;
        let status = response.status();
        debug!(status = %status, target, "store response received");

        let body = response.text().await.map_err(StoreError::transport)?;
        if status.is_success() {
            Ok(RawResponse { status, body })
        } else {
            Err(StoreError::Store {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn sensitive_value(value: &str, what: &str) -> Result<HeaderValue, StockroomError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| StockroomError::Config(format!("invalid {what} header value: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

fn join_path(base: &str, path: &str) -> String {
    format!("{base}{}", path.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    fn config(url: &str) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            api_key: Some("anon-key".into()),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn bases_are_joined_without_double_slashes() {
        let client = RestClient::new(&config("http://localhost:54321/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:54321");
        assert_eq!(client.rest_base(), "http://localhost:54321/rest/v1");
        assert_eq!(client.storage_base(), "http://localhost:54321/storage/v1");
    }

    #[test]
    fn table_url_encodes_params_in_order() {
        let client = RestClient::new(&config("http://localhost:54321")).unwrap();
        let mut params = QueryParams::new();
        params.set_select("*, customers(name)");
        params.push_filter(Filter::eq("status", "Reservado"));
        let url = client.table_url("orders", &params).unwrap();
        assert_eq!(url.path(), "/rest/v1/orders");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*,customers(name)".to_string()),
                ("status".to_string(), "eq.Reservado".to_string()),
            ]
        );
    }

    #[test]
    fn table_url_keeps_encoded_raw_fragment() {
        let client = RestClient::new(&config("http://localhost:54321")).unwrap();
        let mut params = QueryParams::new();
        params.set_select("*");
        params.push_raw("name=ilike.*caf%C3%A9*");
        let url = client.table_url("products", &params).unwrap();
        assert_eq!(url.query(), Some("select=*&name=ilike.*caf%C3%A9*"));
    }

    #[test]
    fn table_url_without_params_has_no_query() {
        let client = RestClient::new(&config("http://localhost:54321")).unwrap();
        let url = client.table_url("products", &QueryParams::new()).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = RestClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, StockroomError::Config(_)));
    }

    #[test]
    fn header_with_newline_is_rejected() {
        let mut cfg = config("http://localhost:54321");
        cfg.api_key = Some("bad\nkey".into());
        let err = RestClient::new(&cfg).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
