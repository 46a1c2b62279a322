// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure outcomes of a resolved query.

use serde::Deserialize;
use stockroom_core::StockroomError;
use thiserror::Error;

/// Why a query did not produce data.
///
/// Every terminal `execute` returns this instead of panicking. Nothing is
/// retried; the caller decides whether to surface or degrade.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network failure, DNS failure, timeout, or a body that could not be read.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with a non-2xx status. `body` is the response text verbatim.
    #[error("store returned {status}: {body}")]
    Store { status: u16, body: String },

    /// The response body was not valid JSON or did not fit the requested row type.
    #[error("failed to decode store response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to encode request body: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The table or object path did not form a valid URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

/// Error payload PostgREST returns alongside non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        StoreError::Transport {
            message,
            source: err,
        }
    }

    /// HTTP status of a store rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Store { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The structured PostgREST error, when the rejection body carries one.
    pub fn api_error(&self) -> Option<ApiErrorBody> {
        match self {
            StoreError::Store { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

impl From<StoreError> for StockroomError {
    fn from(err: StoreError) -> Self {
        StockroomError::Store {
            source: Box::new(err),
        }
    }
}
