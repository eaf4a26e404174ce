//! The `roster rank` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use roster_core::config::load_config_from;
use roster_core::ranking::RankEntry;
use roster_core::report::{format_gpa, EMPTY_ROSTER};

pub fn execute(
    config_path: Option<PathBuf>,
    students: Option<PathBuf>,
    scores: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let roster = super::load_roster(&config, students.as_deref(), scores.as_deref())?;
    let ranking = roster.rank_students();

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&ranking)?),
        "text" => print_table(&ranking),
        other => anyhow::bail!("unknown format: {other}"),
    }

    Ok(())
}

fn print_table(ranking: &[RankEntry]) {
    if ranking.is_empty() {
        println!("{EMPTY_ROSTER}");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Rank", "ID", "Name", "GPA"]);
    for e in ranking {
        table.add_row(vec![
            Cell::new(e.rank),
            Cell::new(&e.id),
            Cell::new(&e.name),
            Cell::new(format_gpa(e.gpa)),
        ]);
    }

    println!("{table}");
}
