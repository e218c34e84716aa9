//! Conversations domain layer: entities, specialists, reply generation, turns

pub mod entities;
pub mod generator;
pub mod orchestrator;
pub mod specialists;
pub mod title;
