//! Networking: REST helpers and the NDJSON evaluation stream driver.

pub mod api;
pub mod eval_stream;
