//! Core module: data models, the audit and optimizer engines, and the
//! collaborators they are loaded through

pub mod audit;
pub mod config;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod report;
pub mod service;
pub mod store;

/// Returns the current version of the `degree-planner` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
