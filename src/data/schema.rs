//! Enrollment Table Schema
//! Column names and enumerations shared across the pipeline.

use std::fmt;

pub const COL_YEAR: &str = "Year";
pub const COL_TERM: &str = "Term";
pub const COL_APPLICATIONS: &str = "Applications";
pub const COL_ADMITTED: &str = "Admitted";
pub const COL_ENROLLED: &str = "Enrolled";
pub const COL_RETENTION: &str = "Retention Rate (%)";
pub const COL_SATISFACTION: &str = "Student Satisfaction (%)";

/// Name of the category column produced by the department reshape.
pub const COL_DEPARTMENT: &str = "Department";

/// Department enrollment columns in their fixed display order.
/// Charts assign colors by category, so this order must stay stable.
pub const DEPARTMENT_COLS: [&str; 4] = [
    "Engineering Enrolled",
    "Business Enrolled",
    "Arts Enrolled",
    "Science Enrolled",
];

/// Columns a loaded CSV must contain to be usable.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    COL_YEAR,
    COL_TERM,
    COL_APPLICATIONS,
    COL_ADMITTED,
    COL_ENROLLED,
    COL_RETENTION,
    COL_SATISFACTION,
    "Engineering Enrolled",
    "Business Enrolled",
    "Arts Enrolled",
    "Science Enrolled",
];

/// Academic term selector.
///
/// Only constrains the user-facing term control; term strings in the data
/// itself pass through unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Spring,
    Fall,
}

impl Term {
    pub const ALL: [Term; 2] = [Term::Spring, Term::Fall];

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Spring => "Spring",
            Term::Fall => "Fall",
        }
    }
}

impl Default for Term {
    fn default() -> Self {
        Term::Spring
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_labels() {
        assert_eq!(Term::Spring.as_str(), "Spring");
        assert_eq!(Term::Fall.as_str(), "Fall");
        assert_eq!(Term::Fall.to_string(), "Fall");
    }

    #[test]
    fn test_required_columns_cover_departments() {
        for col in DEPARTMENT_COLS {
            assert!(REQUIRED_COLUMNS.contains(&col));
        }
    }
}
