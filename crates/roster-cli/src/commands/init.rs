//! The `roster init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("roster.toml").exists() {
        println!("roster.toml already exists, skipping.");
    } else {
        std::fs::write("roster.toml", SAMPLE_CONFIG)?;
        println!("Created roster.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit roster.toml to point data_file at your snapshot");
    println!("  2. Run: roster shell --students students.txt --scores scores.txt");
    println!("  3. Run: roster rank");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# roster configuration

# JSON snapshot loaded when the shell starts
data_file = "data/students.json"

# Save the snapshot when the shell exits
autosave = true

# Where `roster export` writes files without --output
export_dir = "exports"

# Prefix CSV exports with a UTF-8 byte order mark
csv_bom = true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config = roster_core::config::parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(
            config.data_file,
            Some(std::path::PathBuf::from("data/students.json"))
        );
        assert!(config.autosave);
    }
}
