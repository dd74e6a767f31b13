//! Marriage record linking two people.
//!
//! # Invariants
//! - Spouse slots never reference the same person.
//! - Dissolution year is not earlier than marriage year.

use super::date::PartialDate;
use super::{require_ordered, MarriageId, PersonId, RecordValidationError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARRIAGE_TYPE: &str = "spouse";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marriage {
    pub id: Option<MarriageId>,
    /// Nulled by the store when the referenced person is deleted.
    pub spouse1_id: Option<PersonId>,
    pub spouse2_id: Option<PersonId>,
    pub married: Option<PartialDate>,
    pub dissolved: Option<PartialDate>,
    pub dissolution_reason: Option<String>,
    pub marriage_type: String,
    pub notes: String,
}

impl Marriage {
    pub fn new(spouse1_id: PersonId, spouse2_id: PersonId) -> Self {
        Self {
            id: None,
            spouse1_id: Some(spouse1_id),
            spouse2_id: Some(spouse2_id),
            married: None,
            dissolved: None,
            dissolution_reason: None,
            marriage_type: DEFAULT_MARRIAGE_TYPE.to_string(),
            notes: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.dissolved.is_none()
    }

    pub fn involves(&self, person_id: PersonId) -> bool {
        self.spouse1_id == Some(person_id) || self.spouse2_id == Some(person_id)
    }

    /// The other spouse of `person_id`, when `person_id` is part of this marriage.
    pub fn spouse_of(&self, person_id: PersonId) -> Option<PersonId> {
        if self.spouse1_id == Some(person_id) {
            self.spouse2_id
        } else if self.spouse2_id == Some(person_id) {
            self.spouse1_id
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if let (Some(first), Some(second)) = (self.spouse1_id, self.spouse2_id) {
            if first == second {
                return Err(RecordValidationError::SameSpouse(first));
            }
        }
        require_ordered(self.married, self.dissolved, "Marriage", "dissolved")
    }
}
