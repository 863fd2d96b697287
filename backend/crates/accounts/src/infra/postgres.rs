//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{User, VerificationRecord};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{AccountStatus, KycStatus, PlanTier, UserRole};
use crate::error::{AccountError, AccountResult};

const USER_COLUMNS: &str = r#"
    user_id,
    subject,
    email,
    first_name,
    last_name,
    role,
    plan,
    has_paid,
    account_status,
    kyc_status,
    kyc_document_type,
    kyc_document_number,
    kyc_scan_ref,
    kyc_submitted_at,
    kyc_approved_at,
    kyc_metadata,
    activated_at,
    version,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgAccountRepository {
    async fn insert_if_absent(&self, user: &User) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, subject, email, first_name, last_name,
                role, plan, has_paid, account_status, kyc_status,
                activated_at, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (subject) DO NOTHING
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.subject)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.code())
        .bind(user.plan.code())
        .bind(user.has_paid)
        .bind(user.account_status.code())
        .bind(user.kyc_status.code())
        .bind(user.activated_at)
        .bind(user.version)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_subject(&self, subject: &str) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE subject = $1"
        ))
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, user_id: Uuid) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_active_scan_ref(&self, scan_ref: &str) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE kyc_scan_ref = $1"
        ))
        .bind(scan_ref)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update(&self, user: &User) -> AccountResult<bool> {
        let verification = user.verification.as_ref();

        let updated = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                first_name = $3,
                last_name = $4,
                role = $5,
                plan = $6,
                has_paid = $7,
                account_status = $8,
                kyc_status = $9,
                kyc_document_type = $10,
                kyc_document_number = $11,
                kyc_scan_ref = $12,
                kyc_submitted_at = $13,
                kyc_approved_at = $14,
                kyc_metadata = $15,
                activated_at = $16,
                updated_at = $17,
                version = version + 1
            WHERE user_id = $1 AND version = $18
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.code())
        .bind(user.plan.code())
        .bind(user.has_paid)
        .bind(user.account_status.code())
        .bind(user.kyc_status.code())
        .bind(verification.map(|v| v.document_type.clone()))
        .bind(verification.map(|v| v.document_number.clone()))
        .bind(verification.map(|v| v.scan_ref.clone()))
        .bind(verification.map(|v| v.submitted_at))
        .bind(verification.and_then(|v| v.approved_at))
        .bind(verification.map(|v| v.metadata.clone()))
        .bind(user.activated_at)
        .bind(user.updated_at)
        .bind(user.version)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn archive_verification(
        &self,
        user_id: Uuid,
        record: &VerificationRecord,
    ) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kyc_submissions (
                submission_id, user_id, document_type, document_number,
                scan_ref, submitted_at, approved_at, metadata, superseded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&record.document_type)
        .bind(&record.document_number)
        .bind(&record.scan_ref)
        .bind(record.submitted_at)
        .bind(record.approved_at)
        .bind(&record.metadata)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id = %user_id, scan_ref = %record.scan_ref, "Verification archived");

        Ok(())
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    subject: String,
    email: Option<String>,
    first_name: String,
    last_name: String,
    role: String,
    plan: String,
    has_paid: bool,
    account_status: String,
    kyc_status: String,
    kyc_document_type: Option<String>,
    kyc_document_number: Option<String>,
    kyc_scan_ref: Option<String>,
    kyc_submitted_at: Option<DateTime<Utc>>,
    kyc_approved_at: Option<DateTime<Utc>>,
    kyc_metadata: Option<serde_json::Value>,
    activated_at: Option<DateTime<Utc>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountResult<User> {
        let verification = match (self.kyc_scan_ref, self.kyc_submitted_at) {
            (Some(scan_ref), Some(submitted_at)) => Some(VerificationRecord {
                document_type: self.kyc_document_type.unwrap_or_default(),
                document_number: self.kyc_document_number.unwrap_or_default(),
                scan_ref,
                submitted_at,
                approved_at: self.kyc_approved_at,
                metadata: self
                    .kyc_metadata
                    .unwrap_or(serde_json::Value::Object(Default::default())),
            }),
            _ => None,
        };

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            subject: self.subject,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: UserRole::from_code(&self.role)
                .ok_or_else(|| AccountError::Internal(format!("unknown role: {}", self.role)))?,
            plan: PlanTier::from_code(&self.plan)
                .ok_or_else(|| AccountError::Internal(format!("unknown plan: {}", self.plan)))?,
            has_paid: self.has_paid,
            account_status: AccountStatus::from_code(&self.account_status).ok_or_else(|| {
                AccountError::Internal(format!("unknown account status: {}", self.account_status))
            })?,
            kyc_status: KycStatus::from_code(&self.kyc_status).ok_or_else(|| {
                AccountError::Internal(format!("unknown kyc status: {}", self.kyc_status))
            })?,
            verification,
            activated_at: self.activated_at,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
