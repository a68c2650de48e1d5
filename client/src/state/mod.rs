//! Client state slices.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each slice is a plain data structure mutated through explicit methods and
//! exposed to components as an `RwSignal` via context. Keeping the logic off
//! the signals means every transition is testable without a browser.

pub mod auth;
pub mod crud;
pub mod run;
