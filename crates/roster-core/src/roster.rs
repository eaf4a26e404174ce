//! The roster: an ordered collection of student records.
//!
//! Lookups are linear scans returning the first match. Ids are not forced
//! to be unique; [`Roster::add_student`] always appends.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::model::{ScoreEntry, Student, StudentProfile};
use crate::ranking::{self, RankEntry};
use crate::report;

/// An ordered collection of students.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students in roster order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id() == id)
    }

    pub fn find_student_mut(&mut self, id: &str) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id() == id)
    }

    /// Append a student at the tail, even if the id is already taken.
    pub fn add_student(&mut self, id: impl Into<String>, profile: StudentProfile) {
        let id = id.into();
        if self.find_student(&id).is_some() {
            tracing::warn!("adding duplicate student id {id}");
        }
        tracing::debug!("adding student {id}");
        self.students.push(Student::new(id, profile));
    }

    /// Remove and return the first student with the given id.
    pub fn del_student(&mut self, id: &str) -> Result<Student> {
        let index = self
            .students
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| RosterError::not_found(id))?;
        Ok(self.students.remove(index))
    }

    pub fn modify_student(&mut self, id: &str, profile: StudentProfile) -> Result<()> {
        let student = self
            .find_student_mut(id)
            .ok_or_else(|| RosterError::not_found(id))?;
        student.modify(profile);
        Ok(())
    }

    pub fn input_score(
        &mut self,
        id: &str,
        course: &str,
        credit: f64,
        score: f64,
    ) -> Result<ScoreEntry> {
        let student = self
            .find_student_mut(id)
            .ok_or_else(|| RosterError::not_found(id))?;
        Ok(student.input_score(course, credit, score))
    }

    /// Score sheet of one student.
    pub fn query_score(&self, id: &str) -> Result<String> {
        self.find_student(id)
            .map(report::score_sheet)
            .ok_or_else(|| RosterError::not_found(id))
    }

    /// Full profile of one student.
    pub fn query_student(&self, id: &str) -> Result<String> {
        self.find_student(id)
            .map(report::student_detail)
            .ok_or_else(|| RosterError::not_found(id))
    }

    /// One line per student with every field and the GPA when available.
    pub fn display_students(&self) -> String {
        report::roster_listing(self)
    }

    /// Students ordered by descending GPA.
    pub fn rank_students(&self) -> Vec<RankEntry> {
        ranking::rank(self)
    }

    /// Ids that appear more than once, each reported once in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for student in &self.students {
            if !seen.insert(student.id()) && !duplicates.contains(&student.id()) {
                duplicates.push(student.id());
            }
        }
        duplicates
    }
}
