//! Bulk import and export of roster files.
//!
//! The text formats are whitespace-token streams: a student record is ten
//! tokens (`id name gender age college classnum plcstatus phone province
//! parphone`), a score record is four (`id course credit score`). Records
//! may span lines. Reading stops at the first record that is incomplete or
//! fails to parse; whatever was applied before that point stays applied.
//!
//! Exports write one record per line with single-space separators. CSV
//! variants carry a header row and quote fields that need it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, RosterError};
use crate::model::{ScoreEntry, Student, StudentProfile};
use crate::roster::Roster;

/// Column names of a student record, in file order.
pub const STUDENT_FIELDS: [&str; 10] = [
    "id",
    "name",
    "gender",
    "age",
    "college",
    "classnum",
    "plcstatus",
    "phone",
    "province",
    "parphone",
];

/// Column names of a score record, in file order.
pub const SCORE_FIELDS: [&str; 4] = ["id", "course", "credit", "score"];

const UTF8_BOM: &str = "\u{feff}";

/// What an import run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records applied to the roster.
    pub applied: usize,
    /// Applied score records that overwrote an existing course.
    pub updated: usize,
    /// Complete records that were not applied (unknown id, bad CSV row).
    pub skipped: usize,
    /// Reading stopped at leftover input that did not form a record.
    pub stopped_early: bool,
}

impl ImportSummary {
    /// Records read, applied or not.
    pub fn records(&self) -> usize {
        self.applied + self.skipped
    }
}

impl Roster {
    /// Append every student record in a whitespace-token file.
    pub fn import_students(&mut self, path: &Path) -> Result<ImportSummary> {
        let content = read_file(path)?;
        let summary = self.read_students(&content);
        tracing::info!(
            "imported {} student(s) from {}",
            summary.applied,
            path.display()
        );
        Ok(summary)
    }

    /// Enter every score record in a whitespace-token file.
    pub fn import_scores(&mut self, path: &Path) -> Result<ImportSummary> {
        let content = read_file(path)?;
        let summary = self.read_scores(&content);
        tracing::info!(
            "imported {} score(s) from {} ({} skipped)",
            summary.applied,
            path.display(),
            summary.skipped
        );
        Ok(summary)
    }

    /// Append student records parsed from whitespace-separated tokens.
    pub fn read_students(&mut self, input: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();
        let mut tokens = input.split_whitespace();
        loop {
            let record: Vec<&str> = tokens.by_ref().take(STUDENT_FIELDS.len()).collect();
            if record.is_empty() {
                break;
            }
            match parse_student(&record) {
                Some((id, profile)) => {
                    self.add_student(id, profile);
                    summary.applied += 1;
                }
                None => {
                    tracing::debug!("stopping student import at {:?}", record);
                    summary.stopped_early = true;
                    break;
                }
            }
        }
        summary
    }

    /// Enter score records parsed from whitespace-separated tokens.
    pub fn read_scores(&mut self, input: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();
        let mut tokens = input.split_whitespace();
        loop {
            let record: Vec<&str> = tokens.by_ref().take(SCORE_FIELDS.len()).collect();
            if record.is_empty() {
                break;
            }
            let Some((id, course, credit, score)) = parse_score(&record) else {
                tracing::debug!("stopping score import at {:?}", record);
                summary.stopped_early = true;
                break;
            };
            self.apply_score(id, course, credit, score, &mut summary);
        }
        summary
    }

    /// Enter every score row of a CSV file (`id,course,credit,score`).
    ///
    /// A leading header row is skipped. Blank rows are ignored. Rows with
    /// missing cells or non-numeric credit/score are skipped and counted.
    pub fn import_scores_csv(&mut self, path: &Path) -> Result<ImportSummary> {
        let content = read_file(path)?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);
        let mut summary = ImportSummary::default();

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let cells = split_csv_line(line);
            if line_no == 0 && cells.first().is_some_and(|c| is_id_header(c)) {
                continue;
            }
            let parsed = match cells.as_slice() {
                [id, course, credit, score, ..] => parse_finite(credit.trim())
                    .zip(parse_finite(score.trim()))
                    .map(|(credit, score)| (id.trim(), course.trim(), credit, score)),
                _ => None,
            };
            match parsed {
                Some((id, course, credit, score)) => {
                    self.apply_score(id, course, credit, score, &mut summary);
                }
                None => {
                    tracing::warn!("skipping malformed score row {}: {line}", line_no + 1);
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            "imported {} score(s) from {} ({} skipped)",
            summary.applied,
            path.display(),
            summary.skipped
        );
        Ok(summary)
    }

    fn apply_score(
        &mut self,
        id: &str,
        course: &str,
        credit: f64,
        score: f64,
        summary: &mut ImportSummary,
    ) {
        match self.input_score(id, course, credit, score) {
            Ok(entry) => {
                summary.applied += 1;
                if entry == ScoreEntry::Updated {
                    summary.updated += 1;
                }
            }
            Err(e) => {
                tracing::warn!("skipping score for {course}: {e}");
                summary.skipped += 1;
            }
        }
    }

    /// Write one line per student, truncating the destination.
    pub fn export_students(&self, path: &Path) -> Result<()> {
        write_lines(path, None, self.students().iter().map(student_line))?;
        tracing::info!("exported {} student(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Write one line per (student, course) pair, truncating the destination.
    pub fn export_scores(&self, path: &Path) -> Result<()> {
        write_lines(path, None, self.score_rows().map(|row| token_line(&row)))?;
        tracing::info!("exported scores to {}", path.display());
        Ok(())
    }

    /// Write the students as CSV with a header row.
    pub fn export_students_csv(&self, path: &Path, bom: bool) -> Result<()> {
        let header = STUDENT_FIELDS.join(",");
        let rows = self
            .students()
            .iter()
            .map(|s| csv_row(&student_fields(s)));
        write_lines(path, Some((header, bom)), rows)?;
        tracing::info!("exported {} student(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Write the scores as CSV with a header row.
    pub fn export_scores_csv(&self, path: &Path, bom: bool) -> Result<()> {
        let header = SCORE_FIELDS.join(",");
        let rows = self.score_rows().map(|row| csv_row(&row));
        write_lines(path, Some((header, bom)), rows)?;
        tracing::info!("exported scores to {}", path.display());
        Ok(())
    }

    fn score_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.students().iter().flat_map(|s| {
            s.courses().iter().map(move |c| {
                vec![
                    s.id().to_string(),
                    c.name.clone(),
                    c.credit.to_string(),
                    c.score.to_string(),
                ]
            })
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| RosterError::io(path, e))
}

fn write_lines(
    path: &Path,
    header: Option<(String, bool)>,
    lines: impl Iterator<Item = String>,
) -> Result<()> {
    let file = File::create(path).map_err(|e| RosterError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_records(&mut out, header, lines).map_err(|e| RosterError::io(path, e))
}

fn write_records(
    out: &mut impl Write,
    header: Option<(String, bool)>,
    lines: impl Iterator<Item = String>,
) -> std::io::Result<()> {
    if let Some((header, bom)) = header {
        if bom {
            out.write_all(UTF8_BOM.as_bytes())?;
        }
        writeln!(out, "{header}")?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn parse_student(record: &[&str]) -> Option<(String, StudentProfile)> {
    let &[id, name, gender, age, college, classnum, plcstatus, phone, province, parphone] =
        record
    else {
        return None;
    };
    let age = age.parse::<i32>().ok()?;
    Some((
        id.to_string(),
        StudentProfile {
            name: name.to_string(),
            gender: gender.to_string(),
            age,
            college: college.to_string(),
            classnum: classnum.to_string(),
            political_status: plcstatus.to_string(),
            phone: phone.to_string(),
            province: province.to_string(),
            parent_phone: parphone.to_string(),
        },
    ))
}

fn parse_score<'a>(record: &[&'a str]) -> Option<(&'a str, &'a str, f64, f64)> {
    let &[id, course, credit, score] = record else {
        return None;
    };
    Some((id, course, parse_finite(credit)?, parse_finite(score)?))
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn student_fields(s: &Student) -> Vec<String> {
    let p = &s.profile;
    vec![
        s.id().to_string(),
        p.name.clone(),
        p.gender.clone(),
        p.age.to_string(),
        p.college.clone(),
        p.classnum.clone(),
        p.political_status.clone(),
        p.phone.clone(),
        p.province.clone(),
        p.parent_phone.clone(),
    ]
}

fn student_line(s: &Student) -> String {
    token_line(&student_fields(s))
}

/// Join fields with single spaces, warning about any field that would not
/// read back as exactly one token.
fn token_line(fields: &[String]) -> String {
    if let Some(bad) = fields.iter().find(|f| breaks_token_layout(f)) {
        tracing::warn!(
            "field {bad:?} of record {:?} will not re-import as a single token",
            fields.first().map(String::as_str).unwrap_or_default()
        );
    }
    fields.join(" ")
}

fn breaks_token_layout(field: &str) -> bool {
    field.is_empty() || field.contains(char::is_whitespace)
}

fn is_id_header(cell: &str) -> bool {
    let cell = cell.trim();
    cell.eq_ignore_ascii_case("id") || cell == "学号"
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV line, honoring double-quoted cells with `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(ch),
        }
    }
    cells.push(cell);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDENTS: &str = "\
S1 Alice F 20 CS C1 Member 123 Beijing 456
S2 Bob M 21 EE C2 None 789 Shanghai 012
";

    fn roster_with_scores() -> Roster {
        let mut roster = Roster::new();
        roster.read_students(STUDENTS);
        roster.input_score("S1", "Math", 4.0, 90.5).unwrap();
        roster.input_score("S1", "Art", 1.0, 70.0).unwrap();
        roster.input_score("S2", "Math", 4.0, 60.0).unwrap();
        roster
    }

    #[test]
    fn read_students_accepts_records_spanning_lines() {
        let mut roster = Roster::new();
        let summary = roster.read_students("S1 Alice F\n20 CS C1\nMember 123 Beijing 456\n");
        assert_eq!(summary.applied, 1);
        assert!(!summary.stopped_early);
        let s = roster.find_student("S1").unwrap();
        assert_eq!(s.profile.age, 20);
        assert_eq!(s.profile.parent_phone, "456");
    }

    #[test]
    fn read_students_stops_at_malformed_record() {
        let mut roster = Roster::new();
        let input = format!("{STUDENTS}S3 Cat F twenty CS C1 M 1 X 2\nS4 Dan M 22 CS C1 M 1 X 2\n");
        let summary = roster.read_students(&input);
        assert_eq!(summary.applied, 2);
        assert!(summary.stopped_early);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn read_students_ignores_incomplete_tail() {
        let mut roster = Roster::new();
        let summary = roster.read_students(&format!("{STUDENTS}S3 Cat F"));
        assert_eq!(summary.applied, 2);
        assert!(summary.stopped_early);
    }

    #[test]
    fn read_students_keeps_duplicate_ids() {
        let mut roster = Roster::new();
        roster.read_students(STUDENTS);
        roster.read_students(STUDENTS);
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.duplicate_ids(), vec!["S1", "S2"]);
    }

    #[test]
    fn read_scores_upserts_and_skips_unknown_ids() {
        let mut roster = Roster::new();
        roster.read_students(STUDENTS);
        let summary = roster.read_scores("S1 Math 4 90\nS9 Math 4 50\nS1 Math 4 80\nS2 Art 2 x\n");
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.records(), 3);
        assert!(summary.stopped_early);

        let s1 = roster.find_student("S1").unwrap();
        assert_eq!(s1.courses().len(), 1);
        assert_eq!(s1.calc_gpa(), 80.0);
        assert!(roster.find_student("S2").unwrap().courses().is_empty());
    }

    #[test]
    fn read_scores_stops_at_non_finite_numbers() {
        let mut roster = Roster::new();
        roster.read_students(STUDENTS);
        let summary = roster.read_scores("S2 Math 4 90\nS1 Math 4 NaN\nS1 Art 1 70\n");
        assert_eq!(summary.applied, 1);
        assert!(summary.stopped_early);
        assert!(roster.find_student("S1").unwrap().courses().is_empty());

        let summary = roster.read_scores("S1 Math inf 90\n");
        assert_eq!(summary.applied, 0);
        assert!(summary.stopped_early);
    }

    #[test]
    fn student_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.txt");
        let original = roster_with_scores();
        original.export_students(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), STUDENTS);

        let mut restored = Roster::new();
        let summary = restored.import_students(&path).unwrap();
        assert_eq!(summary.applied, 2);
        let profiles = |r: &Roster| {
            r.students()
                .iter()
                .map(|s| (s.id().to_string(), s.profile.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(profiles(&restored), profiles(&original));
    }

    #[test]
    fn score_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let original = roster_with_scores();
        original.export_scores(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "S1 Math 4 90.5\nS1 Art 1 70\nS2 Math 4 60\n"
        );

        let mut restored = Roster::new();
        restored.read_students(STUDENTS);
        restored.import_scores(&path).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn export_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.txt");
        std::fs::write(&path, "stale content that is longer than the export\n".repeat(10)).unwrap();
        roster_with_scores().export_students(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), STUDENTS);
    }

    #[test]
    fn unreadable_and_unwritable_paths_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let mut roster = Roster::new();
        assert!(matches!(
            roster.import_students(&missing),
            Err(RosterError::Io { .. })
        ));
        assert!(matches!(
            roster.import_scores(&missing),
            Err(RosterError::Io { .. })
        ));

        let unwritable = dir.path().join("no-such-dir").join("out.txt");
        assert!(matches!(
            roster.export_students(&unwritable),
            Err(RosterError::Io { .. })
        ));
        assert!(matches!(
            roster.export_scores(&unwritable),
            Err(RosterError::Io { .. })
        ));
    }

    #[test]
    fn csv_export_quotes_and_prefixes_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        let mut roster = Roster::new();
        roster.add_student(
            "S1",
            StudentProfile {
                name: "Lee, \"Ann\"".into(),
                age: 20,
                ..Default::default()
            },
        );
        roster.export_students_csv(&path, true).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let text = text.strip_prefix(UTF8_BOM).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), STUDENT_FIELDS.join(","));
        assert_eq!(lines.next().unwrap(), "S1,\"Lee, \"\"Ann\"\"\",,20,,,,,,");
    }

    #[test]
    fn csv_scores_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let original = roster_with_scores();
        original.export_scores_csv(&path, true).unwrap();

        let mut restored = Roster::new();
        restored.read_students(STUDENTS);
        let summary = restored.import_scores_csv(&path).unwrap();
        assert_eq!(summary.applied, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(restored, original);
    }

    #[test]
    fn csv_import_skips_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(
            &path,
            "id,course,credit,score\nS1,Math,4,90\n\nS1,Art\nS1,PE,two,80\nS9,Math,4,70\n\"S2\",\"Data, Structures\",3,85\n",
        )
        .unwrap();

        let mut roster = Roster::new();
        roster.read_students(STUDENTS);
        let summary = roster.import_scores_csv(&path).unwrap();
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(
            roster.find_student("S2").unwrap().courses()[0].name,
            "Data, Structures"
        );
    }

    #[test]
    fn csv_import_recognises_header_variants() {
        let dir = tempfile::tempdir().unwrap();
        for header in ["ID,Course,Credit,Score", "学号,课程,学分,成绩"] {
            let path = dir.path().join("scores.csv");
            std::fs::write(&path, format!("{header}\nS1,Math,4,90\nS1,Art,1,NaN\n")).unwrap();

            let mut roster = Roster::new();
            roster.read_students(STUDENTS);
            let summary = roster.import_scores_csv(&path).unwrap();
            assert_eq!(summary.applied, 1, "header {header}");
            assert_eq!(summary.skipped, 1, "header {header}");
        }
    }

    #[test]
    fn token_layout_flags_empty_and_spaced_fields() {
        assert!(!breaks_token_layout("Beijing"));
        assert!(breaks_token_layout(""));
        assert!(breaks_token_layout("New York"));
        assert!(breaks_token_layout("a\tb"));

        let fields = vec!["S1".to_string(), "Mary Ann".to_string()];
        assert_eq!(token_line(&fields), "S1 Mary Ann");
    }

    #[test]
    fn split_csv_handles_escaped_quotes() {
        assert_eq!(
            split_csv_line("a,\"b,\"\"c\"\"\",d"),
            vec!["a", "b,\"c\"", "d"]
        );
        assert_eq!(split_csv_line(""), vec![""]);
    }
}
