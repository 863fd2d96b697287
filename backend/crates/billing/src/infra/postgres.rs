//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{PaymentId, UserId};
use kernel::store::InsertOutcome;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::Payment;
use crate::domain::event::PaymentEventLog;
use crate::domain::repository::{PaymentEventLogRepository, PaymentRepository};
use crate::domain::value_object::{PaymentKind, PaymentStatus};
use crate::error::{BillingError, BillingResult};

const PAYMENT_COLUMNS: &str = r#"
    payment_id,
    user_id,
    kind,
    status,
    amount,
    currency,
    intent_id,
    description,
    metadata,
    failure_reason,
    processed_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed payment ledger
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PaymentRepository for PgPaymentRepository {
    async fn insert(&self, payment: &Payment) -> BillingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, user_id, kind, status, amount, currency,
                intent_id, description, metadata, failure_reason,
                processed_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(payment.payment_id.as_uuid())
        .bind(payment.user_id.as_uuid())
        .bind(payment.kind.code())
        .bind(payment.status.code())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.intent_id)
        .bind(&payment.description)
        .bind(&payment.metadata)
        .bind(&payment.failure_reason)
        .bind(payment.processed_at)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> BillingResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE intent_id = $1"
        ))
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn find_by_id(&self, payment_id: Uuid) -> BillingResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn update(&self, payment: &Payment) -> BillingResult<()> {
        sqlx::query(
            r#"
            UPDATE payments SET
                status = $2,
                failure_reason = $3,
                processed_at = $4,
                updated_at = $5
            WHERE payment_id = $1
            "#,
        )
        .bind(payment.payment_id.as_uuid())
        .bind(payment.status.code())
        .bind(&payment.failure_reason)
        .bind(payment.processed_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<PaymentKind>,
        page: u32,
        limit: u32,
    ) -> BillingResult<(Vec<Payment>, u64)> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let (rows, total): (Vec<PaymentRow>, i64) = match kind {
            Some(kind) => {
                let rows = sqlx::query_as::<_, PaymentRow>(&format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments \
                     WHERE user_id = $1 AND kind = $2 \
                     ORDER BY created_at DESC LIMIT $3 OFFSET $4"
                ))
                .bind(user_id)
                .bind(kind.code())
                .bind(i64::from(limit))
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM payments WHERE user_id = $1 AND kind = $2",
                )
                .bind(user_id)
                .bind(kind.code())
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, PaymentRow>(&format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments \
                     WHERE user_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                ))
                .bind(user_id)
                .bind(i64::from(limit))
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE user_id = $1")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;

                (rows, total)
            }
        };

        let items = rows
            .into_iter()
            .map(PaymentRow::into_payment)
            .collect::<BillingResult<Vec<_>>>()?;

        Ok((items, total as u64))
    }
}

/// PostgreSQL-backed provider event log
#[derive(Clone)]
pub struct PgPaymentEventLogRepository {
    pool: PgPool,
}

impl PgPaymentEventLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PaymentEventLogRepository for PgPaymentEventLogRepository {
    async fn insert_if_absent(&self, entry: &PaymentEventLog) -> BillingResult<InsertOutcome> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO payment_events (
                event_id, event_type, payload, processed, error, received_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&entry.event_id)
        .bind(&entry.event_type)
        .bind(&entry.payload)
        .bind(entry.processed)
        .bind(&entry.error)
        .bind(entry.received_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(if inserted == 1 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::AlreadyExists
        })
    }

    async fn find(&self, event_id: &str) -> BillingResult<Option<PaymentEventLog>> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT event_id, event_type, payload, processed, error, received_at \
             FROM payment_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EventRow::into_log))
    }

    async fn mark_processed(&self, event_id: &str) -> BillingResult<()> {
        sqlx::query("UPDATE payment_events SET processed = TRUE, error = NULL WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_failed(&self, event_id: &str, error: &str) -> BillingResult<()> {
        sqlx::query("UPDATE payment_events SET processed = FALSE, error = $2 WHERE event_id = $1")
            .bind(event_id)
            .bind(error)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, page: u32, limit: u32) -> BillingResult<(Vec<PaymentEventLog>, u64)> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT event_id, event_type, payload, processed, error, received_at \
             FROM payment_events ORDER BY received_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_events")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(EventRow::into_log).collect(), total as u64))
    }
}

// Internal row types for sqlx mapping

#[derive(sqlx::FromRow)]
struct PaymentRow {
    payment_id: Uuid,
    user_id: Uuid,
    kind: String,
    status: String,
    amount: i64,
    currency: String,
    intent_id: Option<String>,
    description: String,
    metadata: serde_json::Value,
    failure_reason: Option<String>,
    processed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> BillingResult<Payment> {
        Ok(Payment {
            payment_id: PaymentId::from_uuid(self.payment_id),
            user_id: UserId::from_uuid(self.user_id),
            kind: PaymentKind::from_code(&self.kind)
                .ok_or_else(|| BillingError::Internal(format!("unknown kind: {}", self.kind)))?,
            status: PaymentStatus::from_code(&self.status).ok_or_else(|| {
                BillingError::Internal(format!("unknown status: {}", self.status))
            })?,
            amount: self.amount,
            currency: self.currency,
            intent_id: self.intent_id,
            description: self.description,
            metadata: self.metadata,
            failure_reason: self.failure_reason,
            processed_at: self.processed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    event_id: String,
    event_type: String,
    payload: serde_json::Value,
    processed: bool,
    error: Option<String>,
    received_at: DateTime<Utc>,
}

impl EventRow {
    fn into_log(self) -> PaymentEventLog {
        PaymentEventLog {
            event_id: self.event_id,
            event_type: self.event_type,
            payload: self.payload,
            processed: self.processed,
            error: self.error,
            received_at: self.received_at,
        }
    }
}
