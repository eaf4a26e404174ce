//! GPA ranking.
//!
//! Students are ordered by descending [`Student::calc_gpa`] using
//! `f64::total_cmp`, so the sentinel `-1` sorts after every real average
//! and the order stays total even for NaN scores. The sort is stable:
//! equal averages keep roster order.

use serde::{Deserialize, Serialize};

use crate::model::Student;
use crate::roster::Roster;

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: String,
    pub name: String,
    /// Weighted average, `None` when no GPA has been entered.
    pub gpa: Option<f64>,
}

/// Rank every student on the roster.
pub fn rank(roster: &Roster) -> Vec<RankEntry> {
    let mut ordered: Vec<&Student> = roster.students().iter().collect();
    ordered.sort_by(|a, b| b.calc_gpa().total_cmp(&a.calc_gpa()));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankEntry {
            rank: i + 1,
            id: s.id().to_string(),
            name: s.name().to_string(),
            gpa: s.gpa(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentProfile;

    fn named(name: &str) -> StudentProfile {
        StudentProfile {
            name: name.into(),
            ..Default::default()
        }
    }

    fn sample_roster() -> Roster {
        let mut roster = Roster::new();
        roster.add_student("S1", named("Nobody"));
        roster.add_student("S2", named("Mid"));
        roster.add_student("S3", named("Top"));
        roster.add_student("S4", named("Zero credit"));
        roster.add_student("S5", named("Low"));
        roster.input_score("S2", "Math", 3.0, 75.0).unwrap();
        roster.input_score("S3", "Math", 3.0, 95.0).unwrap();
        roster.input_score("S3", "Art", 1.0, 91.0).unwrap();
        roster.input_score("S4", "Seminar", 0.0, 100.0).unwrap();
        roster.input_score("S5", "Math", 2.0, 0.0).unwrap();
        roster
    }

    #[test]
    fn ranking_is_gpa_descending_with_sentinel_last() {
        let roster = sample_roster();
        let ranked = rank(&roster);
        assert_eq!(ranked.len(), 5);

        let key = |e: &RankEntry| e.gpa.unwrap_or(-1.0);
        for pair in ranked.windows(2) {
            assert!(key(&pair[0]) >= key(&pair[1]));
        }

        assert_eq!(ranked[0].id, "S3");
        assert_eq!(ranked[1].id, "S2");
        assert_eq!(ranked[2].id, "S5");
        assert_eq!(ranked[2].gpa, Some(0.0));
        assert!(ranked[3..].iter().all(|e| e.gpa.is_none()));
    }

    #[test]
    fn ranks_are_one_based_and_contiguous() {
        let ranked = rank(&sample_roster());
        let ranks: Vec<_> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ranking_does_not_reorder_roster() {
        let roster = sample_roster();
        let _ = rank(&roster);
        let ids: Vec<_> = roster.students().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3", "S4", "S5"]);
    }

    #[test]
    fn nan_score_ranks_with_the_unscored() {
        let mut roster = Roster::new();
        roster.add_student("S1", named("Broken"));
        roster.add_student("S2", named("Scored"));
        roster.input_score("S1", "Math", 4.0, f64::NAN).unwrap();
        roster.input_score("S2", "Math", 4.0, 90.0).unwrap();

        let ranked = rank(&roster);
        assert_eq!(ranked[0].id, "S2");
        assert_eq!(ranked[1].id, "S1");
        assert_eq!(ranked[1].gpa, None);
    }

    #[test]
    fn empty_roster_ranks_nothing() {
        assert!(rank(&Roster::new()).is_empty());
    }
}
