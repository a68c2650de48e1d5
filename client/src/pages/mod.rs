//! Route components, one module per page.

pub mod dashboard;
pub mod jobs;
pub mod login;
pub mod metrics;
pub mod playground;
pub mod projects;
pub mod settings;
