//! roster CLI — interactive student roster manager.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod shell;

#[derive(Parser)]
#[command(name = "roster", version, about = "Student roster manager")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Shell {
        /// Student text file to import before the menu starts
        #[arg(long)]
        students: Option<PathBuf>,

        /// Score file (text or .csv) to import before the menu starts
        #[arg(long)]
        scores: Option<PathBuf>,
    },

    /// Print every student with their weighted average
    List {
        /// Student text file (default: configured snapshot)
        #[arg(long)]
        students: Option<PathBuf>,

        /// Score file (text or .csv)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rank students by weighted average
    Rank {
        /// Student text file (default: configured snapshot)
        #[arg(long)]
        students: Option<PathBuf>,

        /// Score file (text or .csv)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Report duplicate student ids
    Check {
        /// Student text file (default: configured snapshot)
        #[arg(long)]
        students: Option<PathBuf>,
    },

    /// Export students or scores
    Export {
        /// Student text file (default: configured snapshot)
        #[arg(long)]
        students: Option<PathBuf>,

        /// Score file (text or .csv)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// What to export: students, scores
        #[arg(long, default_value = "students")]
        what: String,

        /// Output format: text, csv, json, xlsx
        #[arg(long, default_value = "text")]
        format: String,

        /// Destination file (default: timestamped file in the export directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a starter roster.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster_core=warn,roster=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command.unwrap_or(Commands::Shell {
        students: None,
        scores: None,
    }) {
        Commands::Shell { students, scores } => commands::shell::execute(config, students, scores),
        Commands::List {
            students,
            scores,
            format,
        } => commands::list::execute(config, students, scores, format),
        Commands::Rank {
            students,
            scores,
            format,
        } => commands::rank::execute(config, students, scores, format),
        Commands::Check { students } => commands::check::execute(config, students),
        Commands::Export {
            students,
            scores,
            what,
            format,
            output,
        } => commands::export::execute(config, students, scores, what, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
