//! Shared plumbing for the academy services: config loading, tracing setup,
//! health handlers, request-id middleware and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
