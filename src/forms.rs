//! Raw text input from an entry or search screen, validated into typed
//! values. Keeps the "please fill in all fields" and "year must be a number"
//! rules out of the presentation layer.

use crate::error::{StoreError, StoreResult};
use crate::models::StudentRecord;
use crate::query::SearchCriteria;

/// Lowest and highest year the entry form accepts.
pub const MIN_YEAR: u32 = 1;
pub const MAX_YEAR: u32 = 10;

/// Parse a year typed by a user. Surrounding whitespace is ignored.
pub fn parse_year(raw: &str) -> StoreResult<u32> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| StoreError::MalformedYear(trimmed.to_string()))
}

/// Student entry form fields exactly as typed.
#[derive(Debug, Default, Clone)]
pub struct StudentForm {
    pub id: String,
    pub name: String,
    pub course: String,
    pub year: String,
    pub email: String,
    pub phone: String,
}

impl StudentForm {
    /// Populate the form from an existing record when editing.
    pub fn from_record(student: &StudentRecord) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            course: student.course.clone(),
            year: student.year.to_string(),
            email: student.email.clone(),
            phone: student.phone.clone(),
        }
    }

    /// Validate the inputs and return a record ready for the store. Every
    /// field is required; the year must be a number in `MIN_YEAR..=MAX_YEAR`.
    pub fn parse_inputs(&self) -> StoreResult<StudentRecord> {
        let id = required(&self.id, "Student ID")?;
        let name = required(&self.name, "Name")?;
        let course = required(&self.course, "Course")?;
        let year_raw = required(&self.year, "Year")?;
        let email = required(&self.email, "Email")?;
        let phone = required(&self.phone, "Phone")?;

        let year = parse_year(year_raw)?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(StoreError::YearOutOfRange(year));
        }

        Ok(StudentRecord::new(id, name, course, year, email, phone))
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> StoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StoreError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// Search screen fields. Blank fields mean "any".
#[derive(Debug, Default, Clone)]
pub struct SearchForm {
    pub id: String,
    pub name: String,
    pub course: String,
    pub year: String,
}

impl SearchForm {
    pub fn parse_inputs(&self) -> StoreResult<SearchCriteria> {
        let year = match self.year.trim() {
            "" => None,
            raw => Some(parse_year(raw)?),
        };

        Ok(SearchCriteria {
            id: optional(&self.id),
            name: optional(&self.name),
            course: optional(&self.course),
            year,
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn filled() -> StudentForm {
        StudentForm {
            id: " S-100 ".into(),
            name: "Ann Lee".into(),
            course: "Physics".into(),
            year: " 3 ".into(),
            email: "ann@uni.edu".into(),
            phone: "555-0100".into(),
        }
    }

    #[test]
    fn valid_form_produces_trimmed_record() {
        let record = filled().parse_inputs().expect("valid form");
        assert_eq!(record.id, "S-100");
        assert_eq!(record.year, 3);
        assert_eq!(record.course, "Physics");
    }

    #[test]
    fn blank_field_is_reported_by_name() {
        let mut form = filled();
        form.email = "   ".into();
        let err = form.parse_inputs().expect_err("missing email");
        assert!(matches!(err, StoreError::MissingField("Email")));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn non_numeric_year_is_malformed() {
        let mut form = filled();
        form.year = "second".into();
        let err = form.parse_inputs().expect_err("bad year");
        assert!(matches!(err, StoreError::MalformedYear(ref raw) if raw == "second"));
    }

    #[test]
    fn year_outside_range_is_rejected() {
        for year in ["0", "11"] {
            let mut form = filled();
            form.year = year.into();
            assert!(matches!(
                form.parse_inputs(),
                Err(StoreError::YearOutOfRange(_))
            ));
        }
    }

    #[test]
    fn negative_year_is_malformed() {
        assert!(matches!(parse_year("-1"), Err(StoreError::MalformedYear(_))));
    }

    #[test]
    fn editing_round_trips_through_the_form() {
        let record = filled().parse_inputs().expect("valid form");
        let again = StudentForm::from_record(&record)
            .parse_inputs()
            .expect("still valid");
        assert!(record.same_contents(&again));
    }

    #[test]
    fn search_form_maps_blanks_to_none() {
        let form = SearchForm {
            id: "".into(),
            name: " ann ".into(),
            course: "  ".into(),
            year: "".into(),
        };
        let criteria = form.parse_inputs().expect("criteria");
        assert_eq!(criteria, SearchCriteria::new().name("ann"));
    }

    #[test]
    fn search_form_rejects_non_numeric_year() {
        let form = SearchForm {
            year: "2nd".into(),
            ..SearchForm::default()
        };
        assert!(matches!(
            form.parse_inputs(),
            Err(StoreError::MalformedYear(_))
        ));
    }
}
