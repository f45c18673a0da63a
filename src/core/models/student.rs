//! Student record

use serde::{Deserialize, Serialize};

/// A student (user) enrolled in a degree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// User identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Degree the student is enrolled in
    pub degree_id: String,
}

impl Student {
    /// Create a student record
    pub fn new(id: impl Into<String>, name: impl Into<String>, degree_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            degree_id: degree_id.into(),
        }
    }
}
