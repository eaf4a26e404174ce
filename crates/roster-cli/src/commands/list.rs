//! The `roster list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use roster_core::config::load_config_from;
use roster_core::report::{format_gpa, EMPTY_ROSTER};
use roster_core::roster::Roster;

pub fn execute(
    config_path: Option<PathBuf>,
    students: Option<PathBuf>,
    scores: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let roster = super::load_roster(&config, students.as_deref(), scores.as_deref())?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&roster)?),
        "text" => print_table(&roster),
        other => anyhow::bail!("unknown format: {other}"),
    }

    Ok(())
}

fn print_table(roster: &Roster) {
    if roster.is_empty() {
        println!("{EMPTY_ROSTER}");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Gender",
        "Age",
        "College",
        "Class",
        "Political status",
        "Phone",
        "Province",
        "Parent phone",
        "GPA",
    ]);

    for s in roster.students() {
        let p = &s.profile;
        table.add_row(vec![
            Cell::new(s.id()),
            Cell::new(&p.name),
            Cell::new(&p.gender),
            Cell::new(p.age),
            Cell::new(&p.college),
            Cell::new(&p.classnum),
            Cell::new(&p.political_status),
            Cell::new(&p.phone),
            Cell::new(&p.province),
            Cell::new(&p.parent_phone),
            Cell::new(format_gpa(s.gpa())),
        ]);
    }

    println!("{table}");
}
