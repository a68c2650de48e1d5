//! Reusable UI components.

pub mod layout;
pub mod progress;
pub mod run_table;
