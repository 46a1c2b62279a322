// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order status changes and the PATCH body that records them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use stockroom_core::{OrderStatus, StockroomError};

/// Body of the `orders` PATCH that moves an order to a new status.
///
/// `delivered_at` is stamped on delivery, `faturado_at` on invoicing; the
/// other timestamp is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faturado_at: Option<String>,
}

/// Builds the PATCH body for moving an order to `status` at `now`.
pub fn status_change_payload(status: OrderStatus, now: DateTime<Utc>) -> StatusChange {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    StatusChange {
        status,
        delivered_at: (status == OrderStatus::Entregue).then(|| stamp.clone()),
        faturado_at: (status == OrderStatus::Faturado).then(|| stamp.clone()),
        updated_at: stamp,
    }
}

/// Rejects backwards and same-state moves.
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), StockroomError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(StockroomError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
