//! Requirement category (course pool) model

use serde::{Deserialize, Serialize};

/// Identifier of the synthesized deficiency category
pub const DEFICIENCY_CATEGORY_ID: &str = "deficiencies";

/// Identifier of the synthesized exemption category
pub const EXEMPTION_CATEGORY_ID: &str = "exemptions";

/// Id/name fragments marking pools that are not part of the required-course universe
const SPECIAL_POOL_MARKERS: [&str; 4] = ["exemption", "deficien", "used-unused", "coop"];

/// A named pool of courses with a credit quota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCategory {
    /// Category identifier (e.g., "core")
    pub id: String,

    /// Display name (e.g., "Computer Science Core")
    pub name: String,

    /// Member course codes, in display order
    #[serde(default)]
    pub courses: Vec<String>,

    /// Credits needed to satisfy the category
    #[serde(default)]
    pub credits_required: f32,
}

impl RequirementCategory {
    /// Create a category
    pub fn new(id: impl Into<String>, name: impl Into<String>, credits_required: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            courses: Vec::new(),
            credits_required,
        }
    }

    /// Builder-style member list
    #[must_use]
    pub fn with_courses<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for code in codes {
            self.add_course(code.into());
        }
        self
    }

    /// Add a member course (duplicates are ignored)
    pub fn add_course(&mut self, code: String) {
        if !self.courses.contains(&code) {
            self.courses.push(code);
        }
    }

    /// Whether this pool sits outside the required-course universe
    /// (exemption, deficiency, used/unused and co-op pools)
    #[must_use]
    pub fn is_special(&self) -> bool {
        let id = self.id.to_lowercase();
        let name = self.name.to_lowercase();
        SPECIAL_POOL_MARKERS
            .iter()
            .any(|marker| id.contains(marker) || name.contains(marker))
    }

    /// Whether the display name mentions a capstone project
    #[must_use]
    pub fn is_capstone(&self) -> bool {
        self.name.to_lowercase().contains("capstone")
    }
}
