//! Accent-insensitive person lookup.
//!
//! # Invariants
//! - Results keep the natural person order (last name, first name, id).
//! - A query that normalizes to nothing matches nobody.

use crate::model::person::Person;
use crate::repo::person_repo::PersonRepository;
use crate::repo::{PersistenceResult, Repository};
use crate::store::Store;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Folds `text` for comparison: NFKD, combining marks dropped, lowercase,
/// whitespace runs collapsed to one space and trimmed.
pub fn normalize_for_search(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    WHITESPACE_RE.replace_all(folded.trim(), " ").into_owned()
}

/// People whose first, middle, last, maiden or nickname contains `query`.
///
/// A multi-word query also matches against the full `first last` name.
pub fn search_people(store: &Store, query: &str) -> PersistenceResult<Vec<Person>> {
    let needle = normalize_for_search(query);
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let people = PersonRepository::new(store).get_all()?;
    Ok(people
        .into_iter()
        .filter(|person| matches_person(person, &needle))
        .collect())
}

fn matches_person(person: &Person, needle: &str) -> bool {
    let full_name = person.full_name();
    let candidates: Vec<&str> = [
        Some(person.first_name.as_str()),
        Some(person.middle_name.as_str()),
        Some(person.last_name.as_str()),
        person.maiden_name.as_deref(),
        Some(person.nickname.as_str()),
        Some(full_name.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect();
    candidates
        .iter()
        .any(|name| normalize_for_search(name).contains(needle))
}
