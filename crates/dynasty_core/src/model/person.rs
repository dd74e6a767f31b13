//! Person record.
//!
//! # Invariants
//! - `first_name` and `last_name` are non-blank.
//! - A person is never their own father or mother.
//! - `father_id` and `mother_id` never point at the same person.

use super::date::PartialDate;
use super::{require_ordered, require_text, FamilyId, PersonId, RecordValidationError};
use serde::{Deserialize, Serialize};

/// Dynasty grouping used when a record does not name one.
pub const DEFAULT_DYNASTY_ID: i64 = 1;

/// Recorded gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub(crate) fn as_db(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Accepts the spellings older files use (`"M"`, `"female"`, ...).
    pub(crate) fn parse_db(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            "other" | "o" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Which parent slot of a person a link targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
        }
    }
}

/// One member of a dynasty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<PersonId>,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub maiden_name: Option<String>,
    pub nickname: String,
    pub gender: Option<Gender>,
    pub birth: Option<PartialDate>,
    pub death: Option<PartialDate>,
    /// Date the person joined the settlement.
    pub arrival: Option<PartialDate>,
    pub moved_out: Option<PartialDate>,
    pub father_id: Option<PersonId>,
    pub mother_id: Option<PersonId>,
    pub family_id: Option<FamilyId>,
    pub dynasty_id: i64,
    pub is_founder: bool,
    pub education: i64,
    pub is_favorite: bool,
    pub notes: String,
}

impl Person {
    /// Creates an unsaved person with every optional field empty.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            middle_name: String::new(),
            last_name: last_name.into(),
            maiden_name: None,
            nickname: String::new(),
            gender: None,
            birth: None,
            death: None,
            arrival: None,
            moved_out: None,
            father_id: None,
            mother_id: None,
            family_id: None,
            dynasty_id: DEFAULT_DYNASTY_ID,
            is_founder: false,
            education: 0,
            is_favorite: false,
            notes: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_deceased(&self) -> bool {
        self.death.is_some()
    }

    pub fn parent(&self, role: ParentRole) -> Option<PersonId> {
        match role {
            ParentRole::Father => self.father_id,
            ParentRole::Mother => self.mother_id,
        }
    }

    pub fn set_parent(&mut self, role: ParentRole, parent: Option<PersonId>) {
        match role {
            ParentRole::Father => self.father_id = parent,
            ParentRole::Mother => self.mother_id = parent,
        }
    }

    /// Whether the person was alive at some point during `year`.
    pub fn is_alive_in(&self, year: i32) -> bool {
        let born = self.birth.is_some_and(|birth| birth.year() <= year);
        let not_dead = self.death.map_or(true, |death| death.year() >= year);
        born && not_dead
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(&self.first_name, "Person", "first_name")?;
        require_text(&self.last_name, "Person", "last_name")?;
        require_ordered(self.birth, self.death, "Person", "death")?;

        if let Some(id) = self.id {
            if self.father_id == Some(id) || self.mother_id == Some(id) {
                return Err(RecordValidationError::SelfParent(id));
            }
        }
        if let (Some(father), Some(mother)) = (self.father_id, self.mother_id) {
            if father == mother {
                return Err(RecordValidationError::SameParents(father));
            }
        }
        Ok(())
    }
}
