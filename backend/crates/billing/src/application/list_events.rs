//! List Events Use Case
//!
//! Administrative read over the provider event log.

use std::sync::Arc;

use crate::domain::event::PaymentEventLog;
use crate::domain::repository::PaymentEventLogRepository;
use crate::error::BillingResult;

const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of the event log, newest first
#[derive(Debug, Clone)]
pub struct EventPage {
    pub items: Vec<PaymentEventLog>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// List events use case
pub struct ListEventsUseCase<L>
where
    L: PaymentEventLogRepository,
{
    events: Arc<L>,
}

impl<L> ListEventsUseCase<L>
where
    L: PaymentEventLogRepository,
{
    pub fn new(events: Arc<L>) -> Self {
        Self { events }
    }

    pub async fn execute(&self, page: Option<u32>, limit: Option<u32>) -> BillingResult<EventPage> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let (items, total) = self.events.list(page, limit).await?;

        Ok(EventPage {
            items,
            page,
            limit,
            total,
        })
    }
}
