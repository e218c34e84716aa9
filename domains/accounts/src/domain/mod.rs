//! Accounts domain layer: entities and field validation

pub mod entities;
pub mod validation;
