//! API endpoint integration tests
//!
//! Drives the full `/api/v1` router with in-memory stores and a mock LLM.

#![allow(dead_code)]

mod auth;
mod common;
mod conversations;
mod messages;
mod users;
