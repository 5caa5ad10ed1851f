//! Client-side roster filtering over the currently loaded page.

use std::fmt;
use std::str::FromStr;

use rollcall_core::models::common::{Division, Grade};
use rollcall_core::models::student::Student;

/// Grade selector value: `all` or one grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeFilter {
    #[default]
    All,
    Only(Grade),
}

/// Division selector value: `all` or one division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivisionFilter {
    #[default]
    All,
    Only(Division),
}

impl FromStr for GradeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(GradeFilter::All);
        }
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid grade selection '{s}'"))?;
        Grade::try_from(value).map(GradeFilter::Only)
    }
}

impl FromStr for DivisionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(DivisionFilter::All);
        }
        s.trim().parse().map(DivisionFilter::Only)
    }
}

impl fmt::Display for GradeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeFilter::All => f.write_str("all"),
            GradeFilter::Only(g) => write!(f, "{g}"),
        }
    }
}

impl fmt::Display for DivisionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivisionFilter::All => f.write_str("all"),
            DivisionFilter::Only(d) => write!(f, "{d}"),
        }
    }
}

/// Search term plus grade and division selections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub grade: GradeFilter,
    pub division: DivisionFilter,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty()
            || self.grade != GradeFilter::All
            || self.division != DivisionFilter::All
    }

    /// Whether a record passes all three predicates.
    pub fn matches(&self, student: &Student) -> bool {
        self.matches_search(student) && self.matches_grade(student) && self.matches_division(student)
    }

    fn matches_search(&self, student: &Student) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        student.first_name.to_lowercase().contains(&needle)
            || student.last_name.to_lowercase().contains(&needle)
            || student.roll_number.to_string().contains(&needle)
    }

    fn matches_grade(&self, student: &Student) -> bool {
        match self.grade {
            GradeFilter::All => true,
            GradeFilter::Only(grade) => student.grade == grade,
        }
    }

    fn matches_division(&self, student: &Student) -> bool {
        match self.division {
            DivisionFilter::All => true,
            DivisionFilter::Only(division) => student.division == division,
        }
    }
}

/// Records from `records` that satisfy `filter`, in input order.
pub fn visible<'a>(records: &'a [Student], filter: &FilterState) -> Vec<&'a Student> {
    if !filter.is_active() {
        return records.iter().collect();
    }
    records.iter().filter(|s| filter.matches(s)).collect()
}
