//! The `roster export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use roster_core::config::load_config_from;
use roster_core::snapshot;

pub fn execute(
    config_path: Option<PathBuf>,
    students: Option<PathBuf>,
    scores: Option<PathBuf>,
    what: String,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(what.as_str(), "students" | "scores"),
        "unknown export target: {what} (expected students or scores)"
    );
    let extension = match format.as_str() {
        "text" => "txt",
        "csv" => "csv",
        "json" => "json",
        "xlsx" => "xlsx",
        other => anyhow::bail!("unknown format: {other}"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let roster = super::load_roster(&config, students.as_deref(), scores.as_deref())?;

    let (path, generated) = match output {
        Some(path) => (path, None),
        None => {
            std::fs::create_dir_all(&config.export_dir).with_context(|| {
                format!(
                    "failed to create export directory {}",
                    config.export_dir.display()
                )
            })?;
            let name = snapshot::timestamped_name(&what, extension, Local::now());
            (config.export_dir.join(&name), Some(name))
        }
    };

    match (format.as_str(), what.as_str()) {
        ("json", _) => snapshot::save(&roster, &path)?,
        ("csv", "students") => roster.export_students_csv(&path, config.csv_bom)?,
        ("csv", _) => roster.export_scores_csv(&path, config.csv_bom)?,
        ("xlsx", "students") => roster.export_students_xlsx(&path)?,
        ("xlsx", _) => roster.export_scores_xlsx(&path)?,
        (_, "students") => roster.export_students(&path)?,
        _ => roster.export_scores(&path)?,
    }

    if let Some(name) = generated {
        snapshot::record_export(&config.export_dir, &name)?;
    }

    println!("Exported {what} to {}", path.display());
    Ok(())
}
