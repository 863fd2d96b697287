//! Domain Layer

pub mod entity;
pub mod event;
pub mod repository;
pub mod signature;
pub mod value_object;
