//! Provider Event Envelope and Log
//!
//! Inbound payment-provider webhook payloads: the parsed envelope, the
//! closed set of event kinds the reconciler dispatches on, and the
//! append-only log entry recording each delivery's fate.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Parsed webhook envelope: `{id, type, data: {object}}`
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: Value,
}

impl EventEnvelope {
    pub fn kind(&self) -> PaymentEventKind {
        PaymentEventKind::from_type(&self.event_type)
    }
}

/// Known payment event kinds, with an explicit fallthrough
///
/// String dispatch is confined to `from_type`; everything downstream
/// matches exhaustively, so a newly handled provider type shows up as a
/// compile-visible arm instead of a silent string mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEventKind {
    IntentSucceeded,
    IntentFailed,
    ChargeSucceeded,
    ChargeFailed,
    CheckoutCompleted,
    Unknown(String),
}

impl PaymentEventKind {
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "payment_intent.succeeded" => Self::IntentSucceeded,
            "payment_intent.payment_failed" => Self::IntentFailed,
            "charge.succeeded" => Self::ChargeSucceeded,
            "charge.failed" => Self::ChargeFailed,
            "checkout.session.completed" => Self::CheckoutCompleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// One inbound webhook delivery, keyed by the provider's event id
///
/// Append-only: after the insert only `processed` and `error` are ever
/// written. `processed == true` is the dedup gate; a row that exists but
/// is not processed records an attempt that failed and must be re-run.
#[derive(Debug, Clone)]
pub struct PaymentEventLog {
    pub event_id: String,
    pub event_type: String,
    pub payload: Value,
    pub processed: bool,
    pub error: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl PaymentEventLog {
    pub fn new(event_id: String, event_type: String, payload: Value) -> Self {
        Self {
            event_id,
            event_type,
            payload,
            processed: false,
            error: None,
            received_at: Utc::now(),
        }
    }
}
