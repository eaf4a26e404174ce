//! roster configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that replaces `data_file`.
pub const DATA_FILE_ENV: &str = "ROSTER_DATA_FILE";

/// Top-level roster configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// JSON snapshot loaded when the shell starts (None = start empty).
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Save the snapshot back to `data_file` when the shell exits.
    #[serde(default = "default_true")]
    pub autosave: bool,
    /// Directory for exports written without an explicit destination.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Prefix CSV exports with a UTF-8 byte order mark.
    #[serde(default = "default_true")]
    pub csv_bom: bool,
}

fn default_true() -> bool {
    true
}
fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            autosave: true,
            export_dir: default_export_dir(),
            csv_bom: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through as-is, never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Parse a configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RosterConfig> {
    let mut config: RosterConfig = toml::from_str(content)?;
    config.data_file = config.data_file.as_deref().map(resolve_path);
    config.export_dir = resolve_path(&config.export_dir);
    Ok(config)
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `roster.toml` in the current directory
/// 2. `~/.config/roster/config.toml`
///
/// Environment variable override: `ROSTER_DATA_FILE`.
pub fn load_config() -> Result<RosterConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RosterConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("roster.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RosterConfig::default(),
    };

    if let Ok(data_file) = std::env::var(DATA_FILE_ENV) {
        if !data_file.is_empty() {
            config.data_file = Some(PathBuf::from(data_file));
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("roster"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ROSTER_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ROSTER_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ROSTER_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_ROSTER_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_substituted_values() {
        std::env::set_var("_ROSTER_TEST_NESTED", "${_ROSTER_TEST_NESTED}/x");
        assert_eq!(
            resolve_env_vars("${_ROSTER_TEST_NESTED}/data.json"),
            "${_ROSTER_TEST_NESTED}/x/data.json"
        );
        std::env::remove_var("_ROSTER_TEST_NESTED");
    }

    #[test]
    fn default_config() {
        let config = RosterConfig::default();
        assert!(config.data_file.is_none());
        assert!(config.autosave);
        assert!(config.csv_bom);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
data_file = "data/students.json"
autosave = false
export_dir = "out"
csv_bom = false
"#,
        )
        .unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("data/students.json")));
        assert!(!config.autosave);
        assert!(!config.csv_bom);
        assert_eq!(config.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), RosterConfig::default());
    }

    #[test]
    fn parse_expands_env_in_paths() {
        std::env::set_var("_ROSTER_TEST_DIR", "/srv/roster");
        let config = parse_config(r#"data_file = "${_ROSTER_TEST_DIR}/students.json""#).unwrap();
        assert_eq!(
            config.data_file,
            Some(PathBuf::from("/srv/roster/students.json"))
        );
        std::env::remove_var("_ROSTER_TEST_DIR");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, "autosave = false\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert!(!config.autosave);
    }
}
