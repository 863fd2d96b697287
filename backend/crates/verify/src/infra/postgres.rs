//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::store::InsertOutcome;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::event::IdentityEventLog;
use crate::domain::repository::{IdentityEventLogRepository, KycTrackingRepository};
use crate::error::VerifyResult;

/// PostgreSQL-backed identity event log
#[derive(Clone)]
pub struct PgIdentityEventLogRepository {
    pool: PgPool,
}

impl PgIdentityEventLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityEventLogRepository for PgIdentityEventLogRepository {
    async fn insert(&self, entry: &IdentityEventLog) -> VerifyResult<()> {
        sqlx::query(
            r#"
            INSERT INTO identity_events (
                log_id, scan_ref, status, info, processed, error, received_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.log_id.as_uuid())
        .bind(&entry.scan_ref)
        .bind(&entry.status)
        .bind(&entry.info)
        .bind(entry.processed)
        .bind(&entry.error)
        .bind(entry.received_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_processed(&self, log_id: Uuid) -> VerifyResult<()> {
        sqlx::query("UPDATE identity_events SET processed = TRUE, error = NULL WHERE log_id = $1")
            .bind(log_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_failed(&self, log_id: Uuid, error: &str) -> VerifyResult<()> {
        sqlx::query("UPDATE identity_events SET processed = FALSE, error = $2 WHERE log_id = $1")
            .bind(log_id)
            .bind(error)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// PostgreSQL-backed completion-tracking log
#[derive(Clone)]
pub struct PgKycTrackingRepository {
    pool: PgPool,
}

impl PgKycTrackingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl KycTrackingRepository for PgKycTrackingRepository {
    async fn insert_if_absent(
        &self,
        user_id: Uuid,
        scan_ref: &str,
        viewed_at: DateTime<Utc>,
    ) -> VerifyResult<InsertOutcome> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO kyc_tracking_log (tracking_id, user_id, scan_ref, viewed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, scan_ref) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(scan_ref)
        .bind(viewed_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(if inserted == 1 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::AlreadyExists
        })
    }
}
