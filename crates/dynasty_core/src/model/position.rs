//! Saved canvas position of a person box.

use super::PersonId;
use serde::{Deserialize, Serialize};

/// Keyed by `person_id`; at most one position per person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonPosition {
    pub person_id: PersonId,
    /// View the coordinates belong to, e.g. `tree`.
    pub view_type: String,
    pub x: f64,
    pub y: f64,
}

impl PersonPosition {
    pub fn new(person_id: PersonId, view_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            person_id,
            view_type: view_type.into(),
            x,
            y,
        }
    }
}
