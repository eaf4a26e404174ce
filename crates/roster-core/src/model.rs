//! Core data model types for roster.
//!
//! A [`Student`] owns its [`Course`] grades; the [`crate::roster::Roster`]
//! owns its students.

use serde::{Deserialize, Serialize};

/// GPA value reported for a student with no computable average.
///
/// Legitimate averages are non-negative, so the sentinel never collides
/// with a real GPA.
pub const NO_GPA: f64 = -1.0;

/// A graded course on a student's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course name, unique within one student's record.
    pub name: String,
    /// Credit weight.
    pub credit: f64,
    /// Score on the grading scale.
    pub score: f64,
}

impl Course {
    pub fn new(name: impl Into<String>, credit: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            credit,
            score,
        }
    }
}

/// The mutable part of a student's record.
///
/// Serialized names follow the snapshot file layout (`plcstatus`,
/// `parphone`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub college: String,
    pub classnum: String,
    #[serde(rename = "plcstatus")]
    pub political_status: String,
    pub phone: String,
    pub province: String,
    #[serde(rename = "parphone")]
    pub parent_phone: String,
}

/// Outcome of entering a score for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEntry {
    /// The course was new and has been appended.
    Inserted,
    /// An existing course with the same name was overwritten.
    Updated,
}

/// A student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    id: String,
    #[serde(flatten)]
    pub profile: StudentProfile,
    #[serde(default)]
    courses: Vec<Course>,
}

impl Student {
    pub fn new(id: impl Into<String>, profile: StudentProfile) -> Self {
        Self {
            id: id.into(),
            profile,
            courses: Vec::new(),
        }
    }

    /// The student id. Fixed at creation.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Courses in the order they were first entered.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Overwrite every profile field. The id is left untouched.
    pub fn modify(&mut self, profile: StudentProfile) {
        self.profile = profile;
    }

    /// Record a score, replacing the credit and score of a course with the
    /// same name or appending a new course.
    pub fn input_score(&mut self, course: &str, credit: f64, score: f64) -> ScoreEntry {
        if let Some(existing) = self.courses.iter_mut().find(|c| c.name == course) {
            existing.credit = credit;
            existing.score = score;
            return ScoreEntry::Updated;
        }
        self.courses.push(Course::new(course, credit, score));
        ScoreEntry::Inserted
    }

    /// Credit-weighted average score, or [`NO_GPA`] when there are no
    /// courses, the total credit is not positive, or a NaN or infinite
    /// value makes the average meaningless.
    pub fn calc_gpa(&self) -> f64 {
        if self.courses.is_empty() {
            return NO_GPA;
        }
        let (weighted, credits) = self
            .courses
            .iter()
            .fold((0.0, 0.0), |(weighted, credits), c| {
                (weighted + c.score * c.credit, credits + c.credit)
            });
        let gpa = weighted / credits;
        if credits > 0.0 && gpa.is_finite() {
            gpa
        } else {
            NO_GPA
        }
    }

    /// [`Student::calc_gpa`] with the sentinel mapped to `None`.
    pub fn gpa(&self) -> Option<f64> {
        let gpa = self.calc_gpa();
        (gpa >= 0.0).then_some(gpa)
    }
}
