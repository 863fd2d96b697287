//! Domain Layer

pub mod event;
pub mod repository;
