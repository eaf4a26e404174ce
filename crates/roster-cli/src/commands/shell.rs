//! The `roster shell` command.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use roster_core::config::load_config_from;
use roster_core::snapshot;

use crate::shell::Shell;

pub fn execute(
    config_path: Option<PathBuf>,
    students: Option<PathBuf>,
    scores: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let roster = super::load_session(&config, students.as_deref(), scores.as_deref())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let roster = Shell::new(roster, stdin.lock(), stdout.lock())
        .run()
        .context("terminal I/O failed")?;

    if config.autosave {
        if let Some(data_file) = &config.data_file {
            snapshot::save(&roster, data_file)?;
        }
    }

    Ok(())
}
