// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tabular store.
//!
//! `StoreFixture` starts a wiremock server that speaks the store's REST
//! conventions and hands out a [`RestClient`] and a config pointed at it.

use std::path::PathBuf;

use serde_json::Value;
use stockroom_config::model::{StockroomConfig, StoreConfig};
use stockroom_postgrest::RestClient;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// API key every fixture client sends unless overridden.
pub const TEST_API_KEY: &str = "test-anon-key";

/// Priority for mocks narrowed by a query parameter; wins over table-wide mocks.
const NARROW_PRIORITY: u8 = 1;

/// Builder for [`StoreFixture`].
pub struct StoreFixtureBuilder {
    api_key: Option<String>,
    timeout_secs: u64,
}

impl StoreFixtureBuilder {
    fn new() -> Self {
        Self {
            api_key: Some(TEST_API_KEY.to_string()),
            timeout_secs: 5,
        }
    }

    /// Client sends no credentials.
    pub fn anonymous(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub async fn start(self) -> StoreFixture {
        let server = MockServer::start().await;
        let store = StoreConfig {
            url: server.uri(),
            api_key: self.api_key,
            timeout_secs: self.timeout_secs,
            ..StoreConfig::default()
        };
        let client = RestClient::new(&store).expect("fixture store config is valid");
        StoreFixture {
            server,
            client,
            config: StockroomConfig {
                store,
                ..StockroomConfig::default()
            },
        }
    }
}

/// A running mock store.
pub struct StoreFixture {
    server: MockServer,
    client: RestClient,
    config: StockroomConfig,
}

impl StoreFixture {
    pub fn builder() -> StoreFixtureBuilder {
        StoreFixtureBuilder::new()
    }

    /// Starts a fixture with default settings.
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn config(&self) -> &StockroomConfig {
        &self.config
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    fn table_path(table: &str) -> String {
        format!("/rest/v1/{table}")
    }

    /// Any GET on `table` answers `rows`.
    pub async fn serve_rows(&self, table: &str, rows: Value) {
        Mock::given(method("GET"))
            .and(path(Self::table_path(table)))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    /// GETs on `table` carrying `key=value` answer `rows`, ahead of [`serve_rows`](Self::serve_rows).
    pub async fn serve_rows_where(&self, table: &str, key: &str, value: &str, rows: Value) {
        Mock::given(method("GET"))
            .and(path(Self::table_path(table)))
            .and(query_param(key, value))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .with_priority(NARROW_PRIORITY)
            .mount(&self.server)
            .await;
    }

    /// POSTs on `table` succeed. With `returned`, the body is sent back as the
    /// created representation; otherwise the answer is an empty 201.
    pub async fn accept_insert(&self, table: &str, returned: Option<Value>) {
        let response = match returned {
            Some(rows) => ResponseTemplate::new(201).set_body_json(rows),
            None => ResponseTemplate::new(201),
        };
        Mock::given(method("POST"))
            .and(path(Self::table_path(table)))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// PATCHes on `table` succeed and return `rows`.
    pub async fn accept_update(&self, table: &str, rows: Value) {
        Mock::given(method("PATCH"))
            .and(path(Self::table_path(table)))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    /// Requests with `verb` on `table` are rejected with `status` and `body`.
    pub async fn reject(&self, verb: &str, table: &str, status: u16, body: &str) {
        Mock::given(method(verb))
            .and(path(Self::table_path(table)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .with_priority(NARROW_PRIORITY)
            .mount(&self.server)
            .await;
    }

    /// The table root answers 200, as a healthy store does.
    pub async fn serve_health(&self) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far for `table`, in arrival order.
    pub async fn requests_to(&self, table: &str) -> Vec<Request> {
        let wanted = Self::table_path(table);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == wanted)
            .collect()
    }

    /// Writes a `stockroom.toml` pointing at this server into a fresh temp dir.
    pub fn write_config(&self) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("stockroom.toml");
        let mut toml = format!("[store]\nurl = \"{}\"\n", self.server.uri());
        if let Some(key) = &self.config.store.api_key {
            toml.push_str(&format!("api_key = \"{key}\"\n"));
        }
        std::fs::write(&file, toml).expect("write fixture config");
        (dir, file)
    }
}

/// Query pairs of `request`, decoded, in wire order.
pub fn query_pairs(request: &Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
