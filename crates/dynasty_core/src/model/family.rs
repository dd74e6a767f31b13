//! Family (house) grouping of people.

use super::date::PartialDate;
use super::{require_text, FamilyId, RecordValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: Option<FamilyId>,
    pub surname: String,
    pub moved_in: Option<PartialDate>,
    pub coat_of_arms_path: Option<String>,
    /// Display color, usually `#rrggbb`.
    pub family_color: Option<String>,
    pub is_extinct: bool,
    pub notes: String,
}

impl Family {
    pub fn new(surname: impl Into<String>) -> Self {
        Self {
            id: None,
            surname: surname.into(),
            moved_in: None,
            coat_of_arms_path: None,
            family_color: None,
            is_extinct: false,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(&self.surname, "Family", "surname")
    }
}
