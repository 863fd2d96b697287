//! Infrastructure Layer

pub mod idenfy;
pub mod postgres;
