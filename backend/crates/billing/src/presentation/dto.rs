//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{EventPage, HistoryPage};
use crate::domain::entity::Payment;
use crate::domain::event::PaymentEventLog;

/// Response for POST /api/billing/webhooks/stripe
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Request for POST /api/billing/intent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub amount: i64,
    pub currency: String,
    pub asic_model: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<i64>,
    pub bundle_type: Option<String>,
}

/// Response for POST /api/billing/intent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
    pub payment_id: Uuid,
}

/// Query for GET /api/billing/history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub intent_id: Option<String>,
    pub description: String,
    pub failure_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            payment_id: payment.payment_id.into_uuid(),
            kind: payment.kind.code().to_string(),
            status: payment.status.code().to_string(),
            amount: payment.amount,
            currency: payment.currency,
            intent_id: payment.intent_id,
            description: payment.description,
            failure_reason: payment.failure_reason,
            processed_at: payment.processed_at,
            created_at: payment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Response for GET /api/billing/history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub payments: Vec<PaymentResponse>,
    pub pagination: Pagination,
}

impl From<HistoryPage> for HistoryResponse {
    fn from(page: HistoryPage) -> Self {
        Self {
            payments: page.items.into_iter().map(PaymentResponse::from).collect(),
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
            },
        }
    }
}

/// Query for GET /api/billing/events
#[derive(Debug, Clone, Deserialize)]
pub struct EventsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: String,
    pub event_type: String,
    pub processed: bool,
    pub error: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl From<PaymentEventLog> for EventResponse {
    fn from(entry: PaymentEventLog) -> Self {
        Self {
            event_id: entry.event_id,
            event_type: entry.event_type,
            processed: entry.processed,
            error: entry.error,
            received_at: entry.received_at,
        }
    }
}

/// Response for GET /api/billing/events
#[derive(Debug, Clone, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventResponse>,
    pub pagination: Pagination,
}

impl From<EventPage> for EventsResponse {
    fn from(page: EventPage) -> Self {
        Self {
            events: page.items.into_iter().map(EventResponse::from).collect(),
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
            },
        }
    }
}
