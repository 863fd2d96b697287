//! Application Layer - Use Cases

pub mod config;
pub mod create_intent;
pub mod list_events;
pub mod payment_history;
pub mod reconcile_event;

pub use create_intent::{CreateIntentInput, CreateIntentOutput, CreateIntentUseCase};
pub use list_events::{EventPage, ListEventsUseCase};
pub use payment_history::{HistoryPage, PaymentHistoryUseCase};
pub use reconcile_event::ReconcileEventUseCase;
