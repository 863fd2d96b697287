//! Domain Layer

pub mod activation;
pub mod entity;
pub mod repository;
pub mod value_object;
