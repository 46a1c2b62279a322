// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-storage bucket handle (document uploads and their public links).

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use crate::client::RestClient;
use crate::error::StoreError;

/// Content type used when the caller does not know better.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct Bucket {
    client: RestClient,
    name: String,
}

impl Bucket {
    pub(crate) fn new(client: RestClient, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `bytes` under `path` and returns the store's JSON acknowledgement.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Value, StoreError> {
        let raw = format!(
            "{}/object/{}/{}",
            self.client.storage_base(),
            self.name,
            path.trim_start_matches('/')
        );
        let url = RestClient::parse_url(&raw)?;
        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        debug!(bucket = %self.name, path, size = bytes.len(), "uploading object");

        let request = self
            .client
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let response = self.client.dispatch(request, &self.name).await?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|source| StoreError::Decode { source })
    }

    /// Public link to an object in a public bucket. No I/O.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.client.storage_base(),
            self.name,
            path.trim_start_matches('/')
        )
    }
}
