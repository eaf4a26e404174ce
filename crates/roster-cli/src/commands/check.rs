//! The `roster check` command.

use std::path::PathBuf;

use anyhow::Result;

use roster_core::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>, students: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let roster = super::load_roster(&config, students.as_deref(), None)?;

    println!("Roster: {} student(s)", roster.len());

    let duplicates = roster.duplicate_ids();
    for id in &duplicates {
        let count = roster.students().iter().filter(|s| s.id() == *id).count();
        println!("  [{id}] WARNING: duplicate student id ({count} records)");
    }

    if duplicates.is_empty() {
        println!("All student ids unique.");
    } else {
        println!("\n{} duplicate id(s) found.", duplicates.len());
    }

    Ok(())
}
