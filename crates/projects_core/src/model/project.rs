//! Project aggregate model.
//!
//! # Responsibility
//! - Define the project record and its read-only child collections.
//! - Encode the persisted/unpersisted distinction in the type.
//!
//! # Invariants
//! - `project_id` is `Some` if and only if the record has been persisted.
//! - Child collections are populated only by aggregate fetches.
//! - `difficulty` range is checked at entry time, not by storage; rows
//!   written by other clients may carry no difficulty at all.

use crate::model::decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-assigned project identifier.
pub type ProjectId = i64;

/// Lowest accepted difficulty rating.
pub const DIFFICULTY_MIN: i32 = 1;
/// Highest accepted difficulty rating.
pub const DIFFICULTY_MAX: i32 = 5;

/// Returns whether `value` is an accepted difficulty rating.
pub fn is_valid_difficulty(value: i32) -> bool {
    (DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&value)
}

/// Primary entity tracked by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// `None` until the store assigns an identifier.
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    /// `None` only for rows stored without a rating.
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    /// Populated only when fetched by identifier.
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Populated only when fetched by identifier, ordered by `step_order`.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Populated only when fetched by identifier.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Project {
    /// Creates an unpersisted project with empty child collections.
    pub fn new(project_name: impl Into<String>, difficulty: i32) -> Self {
        Self {
            project_id: None,
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: Some(difficulty),
            notes: None,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Returns whether this record carries a store-assigned identifier.
    pub fn is_persisted(&self) -> bool {
        self.project_id.is_some()
    }

    /// Returns a copy without child collections, as produced by list queries.
    pub fn summary(&self) -> Self {
        Self {
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
            ..self.clone()
        }
    }
}

/// Material required by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: i64,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal>,
}

/// One ordered step of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: i64,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i32,
}

/// Category linked to projects through `project_category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}
