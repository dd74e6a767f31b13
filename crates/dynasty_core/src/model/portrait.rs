//! Portrait metadata owned by one person. Image handling lives elsewhere.

use super::date::PartialDate;
use super::{require_ordered, require_text, PersonId, PortraitId, RecordValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portrait {
    pub id: Option<PortraitId>,
    pub person_id: PersonId,
    pub image_path: String,
    pub valid_from: Option<PartialDate>,
    pub valid_to: Option<PartialDate>,
    pub is_primary: bool,
    pub display_order: i64,
}

impl Portrait {
    pub fn new(person_id: PersonId, image_path: impl Into<String>) -> Self {
        Self {
            id: None,
            person_id,
            image_path: image_path.into(),
            valid_from: None,
            valid_to: None,
            is_primary: false,
            display_order: 0,
        }
    }

    /// Whether this portrait applies in `year`; open ends match everything.
    pub fn is_valid_in(&self, year: i32) -> bool {
        self.valid_from.map_or(true, |from| from.year() <= year)
            && self.valid_to.map_or(true, |to| to.year() >= year)
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(&self.image_path, "Portrait", "image_path")?;
        require_ordered(self.valid_from, self.valid_to, "Portrait", "valid_to")
    }
}
