//! roster-core — student records, weighted averages, ranking and file transfer.
//!
//! This crate holds the roster data model and every operation on it. The
//! `roster` binary drives it from an interactive menu.

pub mod config;
pub mod error;
pub mod model;
pub mod ranking;
pub mod report;
pub mod roster;
pub mod snapshot;
pub mod transfer;
pub mod workbook;

pub use error::RosterError;
pub use model::{Course, ScoreEntry, Student, StudentProfile, NO_GPA};
pub use ranking::RankEntry;
pub use roster::Roster;
pub use transfer::ImportSummary;
