//! Error taxonomy for the audit and planning engine

use std::fmt;
use thiserror::Error;

/// Kind of record a lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// Catalog course
    Course,
    /// Degree program
    Degree,
    /// Student timeline
    Timeline,
    /// Student / user record
    Student,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Course => "course",
            Self::Degree => "degree",
            Self::Timeline => "timeline",
            Self::Student => "student",
        };
        f.write_str(name)
    }
}

/// Errors raised by the engine and its data collaborators.
///
/// Everything is propagated to the caller as-is; the engine never retries
/// and never returns partial results in place of an error.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A referenced record does not exist
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of record
        entity: Entity,
        /// Identifier that was looked up
        id: String,
    },

    /// The timeline does not belong to the requesting user
    #[error("timeline '{timeline_id}' does not belong to user '{requester}'")]
    Authorization {
        /// Timeline that was requested
        timeline_id: String,
        /// User making the request
        requester: String,
    },

    /// A term string is not `<Season> <Year>`
    #[error("invalid term format: '{0}'")]
    InvalidTermFormat(String),

    /// Degenerate degree data or engine settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The timeline violates its structural invariants
    #[error("invalid timeline: {0}")]
    InvalidTimeline(String),

    /// Storage failure while acquiring data
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed dataset
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// Shorthand for a [`PlannerError::NotFound`]
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether this is a not-found error for the given entity kind
    #[must_use]
    pub fn is_not_found(&self, kind: Entity) -> bool {
        matches!(self, Self::NotFound { entity, .. } if *entity == kind)
    }
}

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, PlannerError>;
