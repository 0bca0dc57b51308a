//! Standings derived from recorded results.
//!
//! Nothing here is authoritative state: tables are recomputed from the
//! results every time they are asked for.

use serde::{Deserialize, Serialize};

use crate::club::ClubId;
use crate::engine::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub club_id: ClubId,
    pub matches_won: u32,
    pub sets_won: u32,
    pub games_won: u32,
}

impl StandingsRow {
    pub fn new(club_id: ClubId) -> Self {
        Self { club_id, matches_won: 0, sets_won: 0, games_won: 0 }
    }
}

/// State of one playoff series, as shown in a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub round: u32,
    pub top: ClubId,
    pub bottom: ClubId,
    pub score: (u32, u32),
    pub winner: Option<ClubId>,
}

/// Final or current standings of a competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standings {
    Table(Vec<StandingsRow>),
    Bracket(Vec<SeriesSummary>),
}

impl Standings {
    pub fn table(&self) -> Option<&[StandingsRow]> {
        match self {
            Standings::Table(rows) => Some(rows),
            Standings::Bracket(_) => None,
        }
    }

    pub fn bracket(&self) -> Option<&[SeriesSummary]> {
        match self {
            Standings::Table(_) => None,
            Standings::Bracket(series) => Some(series),
        }
    }

    /// Table leader, or the winner of the last decided round.
    pub fn leader(&self) -> Option<ClubId> {
        match self {
            Standings::Table(rows) => rows.first().map(|row| row.club_id),
            Standings::Bracket(series) => {
                let last_round = series.iter().map(|s| s.round).max()?;
                let finals: Vec<&SeriesSummary> =
                    series.iter().filter(|s| s.round == last_round).collect();
                match finals.as_slice() {
                    [last] => last.winner,
                    _ => None,
                }
            }
        }
    }
}

/// Stable sort by (sets won, games won), best first.
pub fn sort_rows(rows: &mut [StandingsRow]) {
    rows.sort_by(|a, b| (b.sets_won, b.games_won).cmp(&(a.sets_won, a.games_won)));
}

/// Table of clubs `0..club_count` built from every recorded day.
pub fn compute_table<'a>(
    club_count: usize,
    results: impl IntoIterator<Item = &'a MatchResult>,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = (0..club_count).map(StandingsRow::new).collect();
    for result in results {
        assert!(
            result.home_id < club_count && result.away_id < club_count,
            "Result {} vs {} references an unknown club",
            result.home_id,
            result.away_id
        );
        let home = &mut rows[result.home_id];
        home.sets_won += result.home_sets;
        home.games_won += result.home_games;
        if result.home_won() {
            home.matches_won += 1;
        }

        let away = &mut rows[result.away_id];
        away.sets_won += result.away_sets;
        away.games_won += result.away_games;
        if !result.home_won() {
            away.matches_won += 1;
        }
    }
    sort_rows(&mut rows);
    rows
}

/// 0-based position of a club in a sorted table.
pub fn position_of(rows: &[StandingsRow], club: ClubId) -> Option<usize> {
    rows.iter().position(|row| row.club_id == club)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(club_id: ClubId, sets_won: u32, games_won: u32) -> StandingsRow {
        StandingsRow { club_id, matches_won: 0, sets_won, games_won }
    }

    #[test]
    fn test_compute_table_from_results() {
        let mut result = MatchResult::walkover(0, 1, true, 2);
        result.home_games = 12;
        result.away_games = 5;
        let table = compute_table(3, [&result]);

        assert_eq!(table[0].club_id, 0);
        assert_eq!(table[0].sets_won, 2);
        assert_eq!(table[0].matches_won, 1);
        assert_eq!(table[1].club_id, 1);
        assert_eq!(table[1].games_won, 5);
        assert_eq!(table[2].club_id, 2);
    }

    #[test]
    fn test_leader() {
        let table = Standings::Table(vec![row(3, 4, 1), row(1, 2, 2)]);
        assert_eq!(table.leader(), Some(3));

        let series = |round, top, bottom, winner| SeriesSummary {
            round,
            top,
            bottom,
            score: (0, 0),
            winner,
        };
        let semis = vec![series(1, 0, 3, Some(0)), series(1, 1, 2, Some(2))];
        assert_eq!(Standings::Bracket(semis.clone()).leader(), None);

        let mut decided = semis;
        decided.push(series(2, 0, 2, Some(2)));
        assert_eq!(Standings::Bracket(decided).leader(), Some(2));
        assert_eq!(Standings::Bracket(Vec::new()).leader(), None);
    }

    #[test]
    fn test_sort_orders_by_sets_then_games() {
        let mut rows = vec![row(0, 2, 10), row(1, 4, 1), row(2, 2, 20)];
        sort_rows(&mut rows);
        let order: Vec<ClubId> = rows.iter().map(|r| r.club_id).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(position_of(&rows, 0), Some(2));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: sorting is stable, ties keep their input order.
            #[test]
            fn prop_sort_is_stable(keys in prop::collection::vec((0u32..4, 0u32..4), 0..40)) {
                let mut rows: Vec<StandingsRow> = keys
                    .iter()
                    .enumerate()
                    .map(|(i, &(sets, games))| row(i, sets, games))
                    .collect();
                sort_rows(&mut rows);
                for pair in rows.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    prop_assert!((a.sets_won, a.games_won) >= (b.sets_won, b.games_won));
                    if (a.sets_won, a.games_won) == (b.sets_won, b.games_won) {
                        prop_assert!(a.club_id < b.club_id);
                    }
                }
            }
        }
    }
}
