//! Domain services: SQL access and the evaluation-run producer.
//!
//! Routes stay thin; each service owns its queries and error enum.

pub mod auth;
pub mod dataset;
pub mod evaluate;
pub mod job;
pub mod metrics;
pub mod project;
pub mod prompt;
pub mod session;
