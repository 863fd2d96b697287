//! Payment History Use Case

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::Payment;
use crate::domain::repository::PaymentRepository;
use crate::domain::value_object::PaymentKind;
use crate::error::{BillingError, BillingResult};

const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a user's ledger, newest first
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub items: Vec<Payment>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Payment history use case
pub struct PaymentHistoryUseCase<P>
where
    P: PaymentRepository,
{
    payments: Arc<P>,
}

impl<P> PaymentHistoryUseCase<P>
where
    P: PaymentRepository,
{
    pub fn new(payments: Arc<P>) -> Self {
        Self { payments }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        kind: Option<&str>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> BillingResult<HistoryPage> {
        let kind = kind
            .map(|code| {
                PaymentKind::from_code(code)
                    .ok_or_else(|| BillingError::InvalidPayload(format!("unknown type: {code}")))
            })
            .transpose()?;

        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let (items, total) = self.payments.list_for_user(user_id, kind, page, limit).await?;

        Ok(HistoryPage {
            items,
            page,
            limit,
            total,
        })
    }
}
