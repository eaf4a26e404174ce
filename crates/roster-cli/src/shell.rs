//! Interactive menu loop.
//!
//! Input is consumed as whitespace-separated tokens, so the fields of one
//! prompt may be typed on one line or spread over several. A non-numeric
//! menu entry discards the rest of its line and the menu is shown again.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use roster_core::model::{ScoreEntry, StudentProfile};
use roster_core::report;
use roster_core::roster::Roster;
use roster_core::transfer::ImportSummary;

/// Reads whitespace-separated tokens across line boundaries.
pub struct TokenReader<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Drop whatever is left of the current line.
    pub fn discard_line(&mut self) {
        self.pending.clear();
    }
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    AddStudent,
    DeleteStudent,
    ModifyStudent,
    DisplayStudents,
    EnterScore,
    QueryScore,
    Rank,
    QueryStudent,
    ExportStudents,
    ExportScores,
}

impl TryFrom<i64> for MenuChoice {
    type Error = i64;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Ok(match n {
            0 => MenuChoice::Exit,
            1 => MenuChoice::AddStudent,
            2 => MenuChoice::DeleteStudent,
            3 => MenuChoice::ModifyStudent,
            4 => MenuChoice::DisplayStudents,
            5 => MenuChoice::EnterScore,
            6 => MenuChoice::QueryScore,
            7 => MenuChoice::Rank,
            8 => MenuChoice::QueryStudent,
            9 => MenuChoice::ExportStudents,
            10 => MenuChoice::ExportScores,
            other => return Err(other),
        })
    }
}

const MENU: &str = "\
===== Student Roster =====
1. Add student
2. Delete student
3. Modify student
4. Display all students
5. Enter or update score
6. Query scores
7. Ranking
8. Query student
9. Export students to file
10. Export scores to file
0. Exit
";

const INVALID_NUMBER: &str = "Invalid input, please enter a number!";
const INVALID_CHOICE: &str = "Invalid choice.";

/// The interactive shell. Owns the roster for the length of a session.
pub struct Shell<R, W> {
    roster: Roster,
    input: TokenReader<R>,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(roster: Roster, input: R, out: W) -> Self {
        Self {
            roster,
            input: TokenReader::new(input),
            out,
        }
    }

    /// Run until the user picks 0 or the input ends, then hand the roster
    /// back to the caller.
    pub fn run(mut self) -> io::Result<Roster> {
        loop {
            write!(self.out, "{MENU}Enter choice: ")?;
            self.out.flush()?;

            let Some(token) = self.input.next_token()? else {
                writeln!(self.out)?;
                break;
            };
            let Ok(number) = token.parse::<i64>() else {
                self.input.discard_line();
                writeln!(self.out, "{INVALID_NUMBER}")?;
                continue;
            };
            match MenuChoice::try_from(number) {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => self.dispatch(choice)?,
                Err(n) => {
                    tracing::debug!("menu choice {n} out of range");
                    writeln!(self.out, "{INVALID_CHOICE}")?;
                }
            }
        }
        writeln!(self.out, "Goodbye.")?;
        Ok(self.roster)
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        match choice {
            MenuChoice::Exit => Ok(()),
            MenuChoice::AddStudent => self.add_student(),
            MenuChoice::DeleteStudent => self.delete_student(),
            MenuChoice::ModifyStudent => self.modify_student(),
            MenuChoice::DisplayStudents => {
                let listing = self.roster.display_students();
                write!(self.out, "{listing}")
            }
            MenuChoice::EnterScore => self.enter_score(),
            MenuChoice::QueryScore => {
                let Some(id) = self.prompt_token("Student ID to query scores for: ")? else {
                    return Ok(());
                };
                let text = self.roster.query_score(&id);
                self.print_result(text)
            }
            MenuChoice::Rank => {
                let text = report::ranking_text(&self.roster.rank_students());
                write!(self.out, "{text}")
            }
            MenuChoice::QueryStudent => {
                let Some(id) = self.prompt_token("Student ID to query: ")? else {
                    return Ok(());
                };
                let text = self.roster.query_student(&id);
                self.print_result(text)
            }
            MenuChoice::ExportStudents => {
                let Some(path) = self.prompt_token("File to export students to: ")? else {
                    return Ok(());
                };
                let path = PathBuf::from(path);
                let result = self
                    .roster
                    .export_students(&path)
                    .map(|()| format!("Students exported to {}\n", path.display()));
                self.print_result(result)
            }
            MenuChoice::ExportScores => {
                let Some(path) = self.prompt_token("File to export scores to: ")? else {
                    return Ok(());
                };
                let path = PathBuf::from(path);
                let result = self
                    .roster
                    .export_scores(&path)
                    .map(|()| format!("Scores exported to {}\n", path.display()));
                self.print_result(result)
            }
        }
    }

    fn add_student(&mut self) -> io::Result<()> {
        let Some(mode) = self.prompt_token("Input mode: 1. Type fields  2. Import file\n")? else {
            return Ok(());
        };
        match mode.as_str() {
            "1" => {
                writeln!(
                    self.out,
                    "Enter ID, name, gender, age, college, class, political status, \
                     phone, province and parent phone:"
                )?;
                let Some(id) = self.input.next_token()? else {
                    return Ok(());
                };
                let Some(profile) = self.read_profile()? else {
                    return Ok(());
                };
                self.roster.add_student(id, profile);
                writeln!(self.out, "Student added.")
            }
            "2" => {
                let Some(path) = self.prompt_token("Student file name: ")? else {
                    return Ok(());
                };
                let path = PathBuf::from(path);
                let result = self
                    .roster
                    .import_students(&path)
                    .map(|summary| format!("Imported {} student(s).\n", summary.applied));
                self.print_result(result)
            }
            _ => writeln!(self.out, "{INVALID_CHOICE}"),
        }
    }

    fn delete_student(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_token("Student ID to delete: ")? else {
            return Ok(());
        };
        let result = self
            .roster
            .del_student(&id)
            .map(|_| "Student deleted.\n".to_string());
        self.print_result(result)
    }

    fn modify_student(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_token("Student ID to modify: ")? else {
            return Ok(());
        };
        writeln!(
            self.out,
            "Enter new name, gender, age, college, class, political status, \
             phone, province and parent phone:"
        )?;
        let Some(profile) = self.read_profile()? else {
            return Ok(());
        };
        let result = self
            .roster
            .modify_student(&id, profile)
            .map(|()| "Student information updated.\n".to_string());
        self.print_result(result)
    }

    fn enter_score(&mut self) -> io::Result<()> {
        let Some(mode) = self.prompt_token("Input mode: 1. Type fields  2. Import file\n")? else {
            return Ok(());
        };
        match mode.as_str() {
            "1" => {
                writeln!(self.out, "Enter student ID, course name, credit and score:")?;
                let Some(id) = self.input.next_token()? else {
                    return Ok(());
                };
                let Some(course) = self.input.next_token()? else {
                    return Ok(());
                };
                let Some(credit) = self.read_finite()? else {
                    return Ok(());
                };
                let Some(score) = self.read_finite()? else {
                    return Ok(());
                };
                let result = self
                    .roster
                    .input_score(&id, &course, credit, score)
                    .map(|entry| match entry {
                        ScoreEntry::Inserted => "Score recorded.\n".to_string(),
                        ScoreEntry::Updated => "Score updated.\n".to_string(),
                    });
                self.print_result(result)
            }
            "2" => {
                let Some(path) = self.prompt_token("Score file name: ")? else {
                    return Ok(());
                };
                let path = PathBuf::from(path);
                let result = if crate::commands::is_csv(&path) {
                    self.roster.import_scores_csv(&path)
                } else {
                    self.roster.import_scores(&path)
                };
                self.print_result(result.map(score_summary))
            }
            _ => writeln!(self.out, "{INVALID_CHOICE}"),
        }
    }

    /// The nine profile fields, in prompt order.
    fn read_profile(&mut self) -> io::Result<Option<StudentProfile>> {
        let Some(name) = self.input.next_token()? else {
            return Ok(None);
        };
        let Some(gender) = self.input.next_token()? else {
            return Ok(None);
        };
        let Some(age) = self.read_number::<i32>()? else {
            return Ok(None);
        };
        let mut rest = Vec::with_capacity(6);
        for _ in 0..6 {
            let Some(token) = self.input.next_token()? else {
                return Ok(None);
            };
            rest.push(token);
        }
        let Ok([college, classnum, political_status, phone, province, parent_phone]) =
            <[String; 6]>::try_from(rest)
        else {
            return Ok(None);
        };
        Ok(Some(StudentProfile {
            name,
            gender,
            age,
            college,
            classnum,
            political_status,
            phone,
            province,
            parent_phone,
        }))
    }

    /// Read one numeric token. A token that does not parse aborts the
    /// current operation and drops the rest of its line.
    fn read_number<T: std::str::FromStr>(&mut self) -> io::Result<Option<T>> {
        let Some(token) = self.input.next_token()? else {
            return Ok(None);
        };
        match token.parse::<T>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                self.input.discard_line();
                writeln!(self.out, "{INVALID_NUMBER}")?;
                Ok(None)
            }
        }
    }

    /// [`Shell::read_number`] for credits and scores; NaN and infinities
    /// are rejected the same way as non-numeric text.
    fn read_finite(&mut self) -> io::Result<Option<f64>> {
        match self.read_number::<f64>()? {
            Some(n) if !n.is_finite() => {
                self.input.discard_line();
                writeln!(self.out, "{INVALID_NUMBER}")?;
                Ok(None)
            }
            n => Ok(n),
        }
    }

    fn prompt_token(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        self.input.next_token()
    }

    fn print_result(&mut self, result: roster_core::error::Result<String>) -> io::Result<()> {
        match result {
            Ok(text) => write!(self.out, "{text}"),
            Err(e) => writeln!(self.out, "{e}"),
        }
    }
}

fn score_summary(summary: ImportSummary) -> String {
    format!(
        "Imported {} score(s) ({} updated, {} skipped).\n",
        summary.applied, summary.updated, summary.skipped
    )
}
