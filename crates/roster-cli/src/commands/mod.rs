pub mod check;
pub mod export;
pub mod init;
pub mod list;
pub mod rank;
pub mod shell;

use std::path::Path;

use anyhow::{Context, Result};

use roster_core::config::RosterConfig;
use roster_core::roster::Roster;
use roster_core::snapshot;

/// Build the roster a one-shot command works on.
///
/// An explicit student file replaces the configured snapshot; a score file
/// is applied on top of whichever roster was loaded.
pub fn load_roster(
    config: &RosterConfig,
    students: Option<&Path>,
    scores: Option<&Path>,
) -> Result<Roster> {
    let mut roster = match (students, &config.data_file) {
        (Some(path), _) => {
            let mut roster = Roster::new();
            roster
                .import_students(path)
                .context("failed to import students")?;
            roster
        }
        (None, Some(data_file)) => snapshot::load(data_file)?,
        (None, None) => Roster::new(),
    };

    apply_scores(&mut roster, scores)?;
    Ok(roster)
}

/// Build the roster an interactive session edits.
///
/// The configured snapshot is always loaded first and an explicit student
/// file is appended to it, so saving the session back never drops records.
pub fn load_session(
    config: &RosterConfig,
    students: Option<&Path>,
    scores: Option<&Path>,
) -> Result<Roster> {
    let mut roster = match &config.data_file {
        Some(data_file) => snapshot::load(data_file)?,
        None => Roster::new(),
    };
    if let Some(path) = students {
        roster
            .import_students(path)
            .context("failed to import students")?;
    }
    apply_scores(&mut roster, scores)?;
    Ok(roster)
}

fn apply_scores(roster: &mut Roster, scores: Option<&Path>) -> Result<()> {
    let Some(path) = scores else {
        return Ok(());
    };
    let imported = if is_csv(path) {
        roster.import_scores_csv(path)
    } else {
        roster.import_scores(path)
    };
    let summary = imported.context("failed to import scores")?;
    if summary.skipped > 0 {
        eprintln!("{} score record(s) skipped", summary.skipped);
    }
    Ok(())
}

pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
