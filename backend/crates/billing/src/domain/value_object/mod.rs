//! Domain Value Objects

pub mod payment_kind;
pub mod payment_status;

pub use payment_kind::PaymentKind;
pub use payment_status::PaymentStatus;
