//! Plain-text rendering of students, score sheets, listings and rankings.

use std::fmt::Write as _;

use crate::model::Student;
use crate::ranking::RankEntry;
use crate::roster::Roster;

/// Shown by listings and rankings of an empty roster.
pub const EMPTY_ROSTER: &str = "No students on record.";

/// Shown by a score sheet with no courses.
pub const NO_SCORES: &str = "This student has no scores recorded yet.";

/// Shown in place of a missing GPA.
pub const GPA_NOT_ENTERED: &str = "not entered";

/// Format a GPA with two decimals, or [`GPA_NOT_ENTERED`].
pub fn format_gpa(gpa: Option<f64>) -> String {
    match gpa {
        Some(g) => format!("{g:.2}"),
        None => GPA_NOT_ENTERED.to_string(),
    }
}

/// Multi-line profile of one student. The GPA line is omitted when no
/// average can be computed.
pub fn student_detail(student: &Student) -> String {
    let p = &student.profile;
    let mut out = String::new();
    let _ = writeln!(out, "Name: {}", p.name);
    let _ = writeln!(out, "Gender: {}", p.gender);
    let _ = writeln!(out, "Age: {}", p.age);
    let _ = writeln!(out, "ID: {}", student.id());
    let _ = writeln!(out, "College: {}", p.college);
    let _ = writeln!(out, "Class: {}", p.classnum);
    let _ = writeln!(out, "Political status: {}", p.political_status);
    let _ = writeln!(out, "Phone: {}", p.phone);
    let _ = writeln!(out, "Province: {}", p.province);
    let _ = writeln!(out, "Parent phone: {}", p.parent_phone);
    if let Some(gpa) = student.gpa() {
        let _ = writeln!(out, "Weighted average: {gpa:.2}");
    }
    out
}

/// Every course of one student followed by the weighted average.
pub fn score_sheet(student: &Student) -> String {
    if student.courses().is_empty() {
        return format!("{NO_SCORES}\n");
    }
    let mut out = format!("Scores for {}:\n", student.name());
    for c in student.courses() {
        let _ = writeln!(
            out,
            "Course: {} Credit: {} Score: {}",
            c.name, c.credit, c.score
        );
    }
    let _ = writeln!(out, "Weighted average: {}", format_gpa(student.gpa()));
    out
}

/// One line per student in roster order.
pub fn roster_listing(roster: &Roster) -> String {
    if roster.is_empty() {
        return format!("{EMPTY_ROSTER}\n");
    }
    let mut out = String::from("Students:\n");
    for s in roster.students() {
        let p = &s.profile;
        let _ = write!(
            out,
            " Name: {} Gender: {} Age: {} ID: {} College: {} Class: {} \
             Political status: {} Phone: {} Province: {} Parent phone: {}",
            p.name,
            p.gender,
            p.age,
            s.id(),
            p.college,
            p.classnum,
            p.political_status,
            p.phone,
            p.province,
            p.parent_phone
        );
        if let Some(gpa) = s.gpa() {
            let _ = write!(out, " Weighted average: {gpa:.2}");
        }
        out.push('\n');
    }
    out
}

/// Rank, id, name and GPA for each ranked student.
pub fn ranking_text(entries: &[RankEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_ROSTER}\n");
    }
    let mut out = String::from("Ranking:\n");
    for e in entries {
        let _ = writeln!(
            out,
            "{} ID: {} Name: {} GPA: {}",
            e.rank,
            e.id,
            e.name,
            format_gpa(e.gpa)
        );
    }
    out
}
