//! Grade levels, grade bands, and grade extraction from free text.

use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// An elementary-school grade level, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Build a grade, rejecting values outside 1..=6.
    pub fn new(value: i64) -> Result<Self, GradeError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(GradeError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The band used to pick an instruction template.
    pub fn band(self) -> GradeBand {
        match self.0 {
            1 | 2 => GradeBand::Low,
            3 | 4 => GradeBand::Mid,
            _ => GradeBand::High,
        }
    }
}

impl TryFrom<i64> for Grade {
    type Error = GradeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grade tiers that share a system-instruction supplement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    /// Grades 1-2.
    Low,
    /// Grades 3-4.
    Mid,
    /// Grades 5-6.
    High,
}

impl std::fmt::Display for GradeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Find the grade in a student's reply.
///
/// Scans left to right and takes the first single ASCII digit in 1-6. Numbers
/// are not parsed as a whole: "I am 16 years old" yields grade 1, and "10"
/// yields 1, while "70" yields nothing because neither 7 nor 0 is a grade.
pub fn extract_grade(text: &str) -> Option<Grade> {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .find(|d| (u32::from(Grade::MIN)..=u32::from(Grade::MAX)).contains(d))
        .map(|d| Grade(d as u8))
}
