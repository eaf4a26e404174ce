//! Excel workbook export.
//!
//! Each export is a single sheet: a bold, frozen header row followed by one
//! row per record. Column widths follow the longest cell, clamped to
//! `MIN_WIDTH..=MAX_WIDTH` characters.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{Result, RosterError};
use crate::roster::Roster;
use crate::transfer::{SCORE_FIELDS, STUDENT_FIELDS};

const MIN_WIDTH: usize = 10;
const MAX_WIDTH: usize = 50;

enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn width(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().len(),
        }
    }
}

impl Roster {
    /// Write the students to a workbook with a "Students" sheet.
    pub fn export_students_xlsx(&self, path: &Path) -> Result<()> {
        let rows = self
            .students()
            .iter()
            .map(|s| {
                let p = &s.profile;
                vec![
                    Cell::Text(s.id().to_string()),
                    Cell::Text(p.name.clone()),
                    Cell::Text(p.gender.clone()),
                    Cell::Number(f64::from(p.age)),
                    Cell::Text(p.college.clone()),
                    Cell::Text(p.classnum.clone()),
                    Cell::Text(p.political_status.clone()),
                    Cell::Text(p.phone.clone()),
                    Cell::Text(p.province.clone()),
                    Cell::Text(p.parent_phone.clone()),
                ]
            })
            .collect::<Vec<_>>();
        save_sheet(path, "Students", &STUDENT_FIELDS, &rows)?;
        tracing::info!("exported {} student(s) to {}", rows.len(), path.display());
        Ok(())
    }

    /// Write one row per (student, course) pair to a "Scores" sheet.
    pub fn export_scores_xlsx(&self, path: &Path) -> Result<()> {
        let rows = self
            .students()
            .iter()
            .flat_map(|s| {
                s.courses().iter().map(move |c| {
                    vec![
                        Cell::Text(s.id().to_string()),
                        Cell::Text(c.name.clone()),
                        Cell::Number(c.credit),
                        Cell::Number(c.score),
                    ]
                })
            })
            .collect::<Vec<_>>();
        save_sheet(path, "Scores", &SCORE_FIELDS, &rows)?;
        tracing::info!("exported {} score(s) to {}", rows.len(), path.display());
        Ok(())
    }
}

fn save_sheet(path: &Path, name: &str, header: &[&str], rows: &[Vec<Cell>]) -> Result<()> {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), name, header, rows)
        .and_then(|_| workbook.save(path))
        .map_err(|source| RosterError::Workbook {
            path: path.to_path_buf(),
            source,
        })
}

fn fill_sheet(
    sheet: &mut Worksheet,
    name: &str,
    header: &[&str],
    rows: &[Vec<Cell>],
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    let bold = Format::new().set_bold();
    for (col, label) in (0u16..).zip(header) {
        sheet.write_string_with_format(0, col, *label, &bold)?;
    }
    for (row, cells) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Text(s) => sheet.write_string(row, col, s)?,
                Cell::Number(n) => sheet.write_number(row, col, *n)?,
            };
        }
    }
    for (col, width) in (0u16..).zip(column_widths(header, rows)) {
        sheet.set_column_width(col, width as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn column_widths(header: &[&str], rows: &[Vec<Cell>]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(col, label)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(Cell::width)
                .chain(std::iter::once(label.chars().count()))
                .max()
                .unwrap_or_default();
            (longest + 2).clamp(MIN_WIDTH, MAX_WIDTH)
        })
        .collect()
}
