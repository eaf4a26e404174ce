//! JSON snapshots of the whole roster and the export log.
//!
//! A snapshot is a JSON array of students, each carrying its courses. A
//! missing snapshot file loads as an empty roster.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::roster::Roster;

/// File name of the export log kept inside an export directory.
pub const EXPORT_LOG: &str = "exports.json";

/// Load a roster snapshot. A missing file yields an empty roster.
pub fn load(path: &Path) -> Result<Roster> {
    if !path.exists() {
        tracing::debug!("no snapshot at {}, starting empty", path.display());
        return Ok(Roster::new());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| RosterError::io(path, e))
        .context("failed to read snapshot")?;
    let roster: Roster = serde_json::from_str(&content).map_err(|e| RosterError::Snapshot {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(
        "loaded {} student(s) from {}",
        roster.len(),
        path.display()
    );
    Ok(roster)
}

/// Save a roster snapshot as pretty JSON, creating parent directories.
pub fn save(roster: &Roster, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(roster).context("failed to serialize roster")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .map_err(|e| RosterError::io(path, e))
        .context("failed to write snapshot")?;
    tracing::info!("saved {} student(s) to {}", roster.len(), path.display());
    Ok(())
}

/// One file written into an export directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// File name relative to the export directory.
    pub name: String,
    /// When the export was written.
    pub saved_at: DateTime<Utc>,
}

/// Generated export file name such as `students_20240131_142500.csv`.
pub fn timestamped_name(stem: &str, extension: &str, at: DateTime<Local>) -> String {
    format!("{stem}_{}.{extension}", at.format("%Y%m%d_%H%M%S"))
}

/// Path of the export log for a directory.
pub fn export_log_path(export_dir: &Path) -> PathBuf {
    export_dir.join(EXPORT_LOG)
}

/// Read the export log. A missing or unreadable log is treated as empty.
pub fn load_export_log(export_dir: &Path) -> Vec<ExportRecord> {
    let path = export_log_path(export_dir);
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| match serde_json::from_str(&content) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("ignoring corrupt export log {}: {e}", path.display());
                None
            }
        })
        .unwrap_or_default()
}

/// Append an entry to the export log of a directory.
pub fn record_export(export_dir: &Path, name: &str) -> Result<()> {
    let mut records = load_export_log(export_dir);
    records.push(ExportRecord {
        name: name.to_string(),
        saved_at: Utc::now(),
    });
    let path = export_log_path(export_dir);
    let json = serde_json::to_string_pretty(&records).context("failed to serialize export log")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write export log {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentProfile;
    use chrono::TimeZone;

    fn sample() -> Roster {
        let mut roster = Roster::new();
        roster.add_student(
            "S1",
            StudentProfile {
                name: "Alice".into(),
                age: 20,
                ..Default::default()
            },
        );
        roster.add_student("S1", StudentProfile::default());
        roster.input_score("S1", "Math", 4.0, 90.0).unwrap();
        roster
    }

    #[test]
    fn missing_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let roster = load(&dir.path().join("students.json")).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn snapshot_round_trip_keeps_duplicates_and_courses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("students.json");
        let roster = sample();
        save(&roster, &path).unwrap();
        assert_eq!(load(&path).unwrap(), roster);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RosterError>(),
            Some(RosterError::Snapshot { .. })
        ));
    }

    #[test]
    fn snapshot_reads_plain_student_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(
            &path,
            r#"[{"id":"S1","name":"Alice","gender":"F","age":20,"college":"CS","classnum":"C1",
                "plcstatus":"Member","phone":"123","province":"Beijing","parphone":"456",
                "courses":[{"name":"Math","credit":4,"score":90}]}]"#,
        )
        .unwrap();
        let roster = load(&path).unwrap();
        assert_eq!(roster.find_student("S1").unwrap().calc_gpa(), 90.0);
    }

    #[test]
    fn timestamped_name_format() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 14, 25, 0).unwrap();
        assert_eq!(
            timestamped_name("students", "csv", at),
            "students_20240131_142500.csv"
        );
    }

    #[test]
    fn export_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_export_log(dir.path()).is_empty());
        record_export(dir.path(), "a.csv").unwrap();
        record_export(dir.path(), "b.txt").unwrap();
        let names: Vec<_> = load_export_log(dir.path())
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a.csv", "b.txt"]);
    }
}
