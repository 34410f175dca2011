//! Filtering over the record store's current collection.

use tracing::debug;

use crate::models::StudentRecord;
use crate::store::RecordStore;

/// Optional per-field criteria, combined with AND. `None` or a blank string
/// matches every record for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the id.
    pub id: Option<String>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the course.
    pub course: Option<String>,
    /// Exact year.
    pub year: Option<u32>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    pub fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn matches(&self, student: &StudentRecord) -> bool {
        contains_ignore_case(&student.id, self.id.as_deref())
            && contains_ignore_case(&student.name, self.name.as_deref())
            && contains_ignore_case(&student.course, self.course.as_deref())
            && self.year.map_or(true, |year| student.year == year)
    }
}

/// An absent or blank needle matches anything.
fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) if needle.trim().is_empty() => true,
        Some(needle) => haystack
            .to_lowercase()
            .contains(&needle.trim().to_lowercase()),
    }
}

/// Search surface over a [`RecordStore`]. Every call scans the store's
/// collection as it is at that moment, in insertion order.
pub struct QueryEngine<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> QueryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Exact id lookup, as a zero-or-one element list.
    pub fn by_id(&self, id: &str) -> Vec<StudentRecord> {
        self.store.find_by_id(id).into_iter().collect()
    }

    pub fn by_name(&self, name: &str) -> Vec<StudentRecord> {
        self.search(&SearchCriteria::new().name(name))
    }

    pub fn by_course(&self, course: &str) -> Vec<StudentRecord> {
        self.search(&SearchCriteria::new().course(course))
    }

    pub fn by_year(&self, year: u32) -> Vec<StudentRecord> {
        self.search(&SearchCriteria::new().year(year))
    }

    pub fn search(&self, criteria: &SearchCriteria) -> Vec<StudentRecord> {
        let results: Vec<StudentRecord> = self
            .store
            .all()
            .into_iter()
            .filter(|student| criteria.matches(student))
            .collect();
        debug!(?criteria, hits = results.len(), "student search");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> StudentRecord {
        StudentRecord::new("2024-001", "Ann Lee", "Computer Science", 2, "ann@uni.edu", "555-1")
    }

    #[test]
    fn empty_criteria_match_everything() {
        assert!(SearchCriteria::new().matches(&ann()));
        assert!(SearchCriteria::new().name("").course("   ").matches(&ann()));
    }

    #[test]
    fn string_criteria_are_case_insensitive_substrings() {
        assert!(SearchCriteria::new().name("LEE").matches(&ann()));
        assert!(SearchCriteria::new().course("science").matches(&ann()));
        assert!(SearchCriteria::new().id("001").matches(&ann()));
        assert!(!SearchCriteria::new().name("bob").matches(&ann()));
    }

    #[test]
    fn year_is_exact() {
        assert!(SearchCriteria::new().year(2).matches(&ann()));
        assert!(!SearchCriteria::new().year(3).matches(&ann()));
    }

    #[test]
    fn criteria_combine_with_and() {
        assert!(!SearchCriteria::new().name("ann").year(3).matches(&ann()));
        assert!(SearchCriteria::new().name("ann").course("computer").year(2).matches(&ann()));
    }
}
