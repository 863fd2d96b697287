//! Domain Entities

pub mod payment;

pub use payment::Payment;
