use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Student gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

/// Division (section) label within a grade.
///
/// The canonical set is the nine letters A through I. A blank division is not
/// accepted anywhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Division {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
}

impl Division {
    pub const ALL: [Division; 9] = [
        Division::A,
        Division::B,
        Division::C,
        Division::D,
        Division::E,
        Division::F,
        Division::G,
        Division::H,
        Division::I,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::A => "A",
            Division::B => "B",
            Division::C => "C",
            Division::D => "D",
            Division::E => "E",
            Division::F => "F",
            Division::G => "G",
            Division::H => "H",
            Division::I => "I",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Division::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown division '{s}' (expected one of A-I)"))
    }
}

/// Grade level, always within 1..=12.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 12;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every grade from 1 to 12 in order.
    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value).ok_or_else(|| format!("grade {value} is outside 1-12"))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A free-form `{key, value}` pair attached to a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}
