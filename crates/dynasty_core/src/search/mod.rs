//! Name search entry points.
//!
//! # Responsibility
//! - Normalize names so lookups ignore case, accents and spacing.
//! - Keep search result shaping inside core.

pub mod people;

pub use people::{normalize_for_search, search_people};
