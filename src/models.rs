//! Domain models persisted by the stores and passed to the query and report
//! layers. These stay plain data holders; validation of raw user input lives
//! in `forms`, persistence in `db`.

use std::fmt;

#[derive(Debug, Clone)]
/// A single student. Identity is the `id` alone: two records with the same id
/// compare equal even if every other field differs, which is what the store's
/// uniqueness rule and `update` (replace by id) rely on.
pub struct StudentRecord {
    /// Institution-assigned identifier, the unique key of the collection.
    pub id: String,
    pub name: String,
    pub course: String,
    /// Year of study. The entry form restricts it to 1..=10; the store
    /// accepts whatever it is handed.
    pub year: u32,
    pub email: String,
    pub phone: String,
}

impl StudentRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        course: impl Into<String>,
        year: u32,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            course: course.into(),
            year,
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Field-by-field comparison, for callers that care about more than
    /// identity (round-trip checks, change detection).
    pub fn same_contents(&self, other: &StudentRecord) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.course == other.course
            && self.year == other.year
            && self.email == other.email
            && self.phone == other.phone
    }
}

impl PartialEq for StudentRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StudentRecord {}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, year {})", self.name, self.course, self.year)
    }
}

/// Role tag given to the account seeded on first run.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A login account. Passwords are kept as plain text; the credential store
/// only ever compares them.
pub struct UserAccount {
    pub username: String,
    pub password: String,
    /// Free-form role tag such as `admin` or `staff`.
    pub role: String,
}

impl UserAccount {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }
}

impl fmt::Display for UserAccount {
    /// Never prints the password.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.username, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_compare_by_id_only() {
        let a = StudentRecord::new("S1", "Ann", "CS", 2, "ann@example.edu", "555-0100");
        let b = StudentRecord::new("S1", "Bob", "EE", 4, "bob@example.edu", "555-0199");
        assert_eq!(a, b);
        assert!(!a.same_contents(&b));
    }

    #[test]
    fn account_display_hides_password() {
        let account = UserAccount::new("clerk", "hunter2", "staff");
        let shown = account.to_string();
        assert_eq!(shown, "clerk [staff]");
        assert!(!account.is_admin());
    }
}
