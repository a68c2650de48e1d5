//! Shared client utilities.

pub mod auth;
pub mod persistence;
