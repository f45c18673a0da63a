//! Degree audit and graduation path planning
//!
//! Audits a student's timeline against their degree requirements and
//! extends the timeline with the remaining courses, honoring offerings,
//! prerequisites and a per-term credit cap. Shared by the CLI and any
//! embedding host.

pub mod core;
pub mod logger;

pub use crate::core::error::{PlannerError, Result};
pub use crate::core::{config, get_version};
