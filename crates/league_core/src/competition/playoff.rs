//! Cup: single elimination in best-of-N series.
//!
//! Seeds come from the final regular season table. Within each strength
//! block of seeds the order is drawn at random (the pre-draw), then seeds
//! are paired by a fixed bracket template. Winners of neighbouring series
//! meet in the next round.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::schedule::{ScheduleDay, ScheduledMatch};
use super::standings::{position_of, sort_rows, SeriesSummary, StandingsRow};
use super::{play_match, Calendar};
use crate::club::{Club, ClubId};
use crate::config::constants::CUP_TITLE;
use crate::config::{MatchParams, PlayoffParams};
use crate::engine::MatchResult;

/// Bracket of 16: seed pairs by pre-draw position.
pub const LONG_BRACKET: [(usize, usize); 8] =
    [(0, 8), (4, 9), (2, 10), (5, 11), (1, 12), (6, 13), (3, 14), (7, 15)];

/// Bracket of 8.
pub const SHORT_BRACKET: [(usize, usize); 4] = [(0, 4), (2, 5), (1, 6), (3, 7)];

// ============================================================================
// Series
// ============================================================================

/// One recorded game of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesGame {
    pub home: ClubId,
    pub away: ClubId,
    pub home_sets: u32,
    pub away_sets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeries {
    pub round: u32,
    pub top: ClubId,
    pub bottom: ClubId,
    matches_to_win: u32,
    games: Vec<SeriesGame>,
}

impl PlayoffSeries {
    pub fn new(round: u32, top: ClubId, bottom: ClubId, matches_to_win: u32) -> Self {
        Self { round, top, bottom, matches_to_win, games: Vec::new() }
    }

    pub fn pair(&self) -> (ClubId, ClubId) {
        (self.top, self.bottom)
    }

    pub fn games(&self) -> &[SeriesGame] {
        &self.games
    }

    /// Wins of (top, bottom).
    pub fn score(&self) -> (u32, u32) {
        self.games.iter().fold((0, 0), |(top, bottom), game| {
            let winner = if game.home_sets > game.away_sets { game.home } else { game.away };
            if winner == self.top {
                (top + 1, bottom)
            } else {
                (top, bottom + 1)
            }
        })
    }

    /// First side to reach the majority of the series.
    pub fn winner(&self) -> Option<ClubId> {
        let (top, bottom) = self.score();
        if top >= self.matches_to_win {
            Some(self.top)
        } else if bottom >= self.matches_to_win {
            Some(self.bottom)
        } else {
            None
        }
    }

    /// Records a game.
    ///
    /// # Panics
    ///
    /// When the result involves a club outside the series or is a tie: the
    /// schedule produced an impossible match.
    pub fn add_result(&mut self, result: &MatchResult) {
        let clubs = [self.top, self.bottom];
        assert!(
            clubs.contains(&result.home_id),
            "Club #{} is not involved in this series",
            result.home_id
        );
        assert!(
            clubs.contains(&result.away_id),
            "Club #{} is not involved in this series",
            result.away_id
        );
        assert_ne!(
            result.home_sets, result.away_sets,
            "Number of sets won by opponents should not be equal"
        );
        self.games.push(SeriesGame {
            home: result.home_id,
            away: result.away_id,
            home_sets: result.home_sets,
            away_sets: result.away_sets,
        });
    }

    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            round: self.round,
            top: self.top,
            bottom: self.bottom,
            score: self.score(),
            winner: self.winner(),
        }
    }
}

// ============================================================================
// Pre-draw
// ============================================================================

/// Seed blocks `[0]`, `[1]`, `[2, 3]`, `[4..8)`, ... each shuffled in place.
pub fn make_pre_draw<R: Rng + ?Sized>(blocks: u32, rng: &mut R) -> Vec<usize> {
    let mut pre_draw = Vec::new();
    for i in 0..blocks {
        let mut block: Vec<usize> = if i < 2 {
            vec![i as usize]
        } else {
            ((1usize << (i - 1))..(1usize << i)).collect()
        };
        block.shuffle(rng);
        pre_draw.extend(block);
    }
    pre_draw
}

/// Pairs of pre-draw positions for a bracket of `size` clubs.
fn bracket_template(size: usize) -> Vec<(usize, usize)> {
    match size {
        16 => LONG_BRACKET.to_vec(),
        8 => SHORT_BRACKET.to_vec(),
        _ => (0..size / 2).map(|i| (i, i + size / 2)).collect(),
    }
}

/// Largest power of two not above both the requested length and the
/// number of clubs.
fn bracket_size(requested: usize, clubs: usize) -> usize {
    let cap = requested.min(clubs).max(2);
    1 << (usize::BITS - 1 - cap.leading_zeros())
}

// ============================================================================
// Playoff
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playoff {
    params: PlayoffParams,
    match_rules: MatchParams,
    /// Regular season table, best first.
    seeding: Vec<StandingsRow>,
    round: u32,
    /// Every series ever drawn; scheduled matches refer to them by index.
    series: Vec<PlayoffSeries>,
    current_round: Vec<usize>,
    participants: Vec<ClubId>,
    calendar: Calendar,
}

impl Playoff {
    pub fn new<R: Rng + ?Sized>(
        params: PlayoffParams,
        match_rules: MatchParams,
        standings: Vec<StandingsRow>,
        rng: &mut R,
    ) -> Self {
        let mut seeding = standings;
        sort_rows(&mut seeding);

        let mut playoff = Self {
            params,
            match_rules,
            seeding,
            round: 1,
            series: Vec::new(),
            current_round: Vec::new(),
            participants: Vec::new(),
            calendar: Calendar::new(Vec::new()),
        };
        playoff.make_initial_round(rng);
        playoff
    }

    pub fn title(&self) -> &'static str {
        CUP_TITLE
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn series(&self) -> &[PlayoffSeries] {
        &self.series
    }

    pub fn current_series(&self) -> impl Iterator<Item = &PlayoffSeries> {
        self.current_round.iter().map(move |&i| &self.series[i])
    }

    pub fn participants(&self) -> &[ClubId] {
        &self.participants
    }

    /// Unplayed matches of today.
    pub fn current_matches(&self) -> Option<Vec<ScheduledMatch>> {
        self.calendar
            .current_matches()
            .map(|day| day.iter().filter(|m| !m.is_played).copied().collect())
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round.len() == 1
    }

    pub fn is_over(&self) -> bool {
        self.is_final_round()
            && self.current_series().all(|series| series.winner().is_some())
            && self.calendar.day() >= self.calendar.len()
    }

    /// Whether the next update is the last day of the final round.
    pub fn ends_with_next_update(&self) -> bool {
        !self.is_over() && self.is_final_round() && self.calendar.day() + 1 >= self.calendar.len()
    }

    /// Matches get more important with every round.
    pub fn match_importance(&self) -> i64 {
        self.params.match_importance * i64::from(self.round)
    }

    pub fn standings(&self) -> Vec<SeriesSummary> {
        self.series.iter().map(PlayoffSeries::summary).collect()
    }

    pub fn champion(&self) -> Option<ClubId> {
        if !self.is_final_round() {
            return None;
        }
        self.current_series().next().and_then(PlayoffSeries::winner)
    }

    /// `fame_base * 2^series_won` for every participant.
    pub fn club_fame(&self, club: ClubId) -> i64 {
        if !self.participants.contains(&club) {
            return 0;
        }
        let wins = self.series.iter().filter(|s| s.winner() == Some(club)).count() as u32;
        self.params.fame_base * 2i64.pow(wins)
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        clubs: &mut [Club],
        rng: &mut R,
    ) -> Option<Vec<MatchResult>> {
        if self.is_over() {
            return None;
        }

        let Some(matches) = self.calendar.current_day_mut() else {
            self.calendar.advance(None);
            self.draw_next_round_if_due();
            return None;
        };

        let mut day_results = Vec::new();
        for scheduled in matches.iter_mut().filter(|m| !m.is_played) {
            let result = play_match(clubs, scheduled.home, scheduled.away, &self.match_rules, rng);
            scheduled.is_played = true;
            if let Some(index) = scheduled.series {
                self.series[index].add_result(&result);
            }
            day_results.push(result);
        }
        self.calendar.advance(Some(day_results.clone()));
        self.mark_decided_series();
        self.draw_next_round_if_due();
        Some(day_results)
    }

    // ========================================================================
    // Draw
    // ========================================================================

    fn make_initial_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = bracket_size(self.params.length, self.seeding.len());
        let blocks = size.trailing_zeros() + 1;
        let pre_draw = make_pre_draw(blocks, rng);
        let to_win = self.params.matches_to_win() as u32;

        for (top, bottom) in bracket_template(size) {
            let top = self.seeding[pre_draw[top]].club_id;
            let bottom = self.seeding[pre_draw[bottom]].club_id;
            self.current_round.push(self.series.len());
            self.series.push(PlayoffSeries::new(self.round, top, bottom, to_win));
            self.participants.extend([top, bottom]);
        }
        self.schedule_round();
    }

    fn draw_next_round_if_due(&mut self) {
        if self.calendar.day() < self.calendar.len() || self.is_final_round() {
            return;
        }
        let winners: Vec<ClubId> = self
            .current_series()
            .map(|series| series.winner())
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();
        assert_eq!(
            winners.len(),
            self.current_round.len(),
            "Cup round {} ended with undecided series",
            self.round
        );

        self.round += 1;
        let to_win = self.params.matches_to_win() as u32;
        let mut next_round = Vec::new();
        for pair in winners.chunks(2) {
            let (mut top, mut bottom) = (pair[0], pair[1]);
            if self.seed_position(bottom) < self.seed_position(top) {
                std::mem::swap(&mut top, &mut bottom);
            }
            next_round.push(self.series.len());
            self.series.push(PlayoffSeries::new(self.round, top, bottom, to_win));
        }
        self.current_round = next_round;
        self.schedule_round();
    }

    fn seed_position(&self, club: ClubId) -> usize {
        position_of(&self.seeding, club).unwrap_or(usize::MAX)
    }

    /// Gap days, then one day per pattern entry followed by gap days.
    fn schedule_round(&mut self) {
        let pattern = self.params.series_matches_pattern.clone();
        self.insert_gap();
        for top_at_home in pattern {
            let mut day: ScheduleDay = self
                .current_round
                .iter()
                .map(|&index| {
                    let series = &self.series[index];
                    if top_at_home {
                        ScheduledMatch::in_series(series.top, series.bottom, index)
                    } else {
                        ScheduledMatch::in_series(series.bottom, series.top, index)
                    }
                })
                .collect();
            day.reverse();
            self.calendar.push_day(Some(day));
            self.insert_gap();
        }
    }

    fn insert_gap(&mut self) {
        for _ in 0..self.params.gap_days {
            self.calendar.push_day(None);
        }
    }

    /// Remaining games of decided series are not played.
    fn mark_decided_series(&mut self) {
        let series = &self.series;
        self.calendar.for_each_remaining_match(|scheduled| {
            let decided = scheduled
                .series
                .and_then(|index| series.get(index))
                .map_or(false, |s| s.winner().is_some());
            if decided {
                scheduled.is_played = true;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::Court;
    use crate::config::GameParams;
    use crate::player::{PlayerModel, Surface};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn clubs(n: usize) -> Vec<Club> {
        (0..n)
            .map(|i| {
                let mut club = Club::new(format!("Club {}", i), Surface::Clay, 1, Court::new(1000, 1000));
                club.add_player(PlayerModel::new("A", "B", "C", 30 + i as i64 * 4, 1000, 18, Surface::Clay));
                club
            })
            .collect()
    }

    /// Club `i` finished `i`-th.
    fn table(n: usize) -> Vec<StandingsRow> {
        (0..n)
            .map(|i| StandingsRow {
                club_id: i,
                matches_won: 0,
                sets_won: (100 - i) as u32,
                games_won: 0,
            })
            .collect()
    }

    fn playoff(n: usize, length: usize, rng: &mut ChaCha8Rng) -> Playoff {
        let mut params = GameParams::default();
        params.playoff.length = length;
        Playoff::new(params.playoff, params.match_rules, table(n), rng)
    }

    fn result(home: ClubId, away: ClubId, home_wins: bool) -> MatchResult {
        let mut result = MatchResult::walkover(home, away, home_wins, 2);
        result.is_walkover = false;
        result
    }

    #[test]
    fn test_pre_draw_shuffles_within_blocks() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let pre_draw = make_pre_draw(5, &mut rng);
        assert_eq!(pre_draw.len(), 16);
        assert_eq!(pre_draw[0], 0);
        assert_eq!(pre_draw[1], 1);
        let block: HashSet<usize> = pre_draw[2..4].iter().copied().collect();
        assert_eq!(block, [2, 3].into_iter().collect());
        let block: HashSet<usize> = pre_draw[8..16].iter().copied().collect();
        assert_eq!(block, (8..16).collect());
    }

    #[test]
    fn test_series_winner_needs_majority() {
        let mut series = PlayoffSeries::new(1, 3, 7, 4);
        for _ in 0..3 {
            series.add_result(&result(3, 7, true));
            series.add_result(&result(7, 3, true));
        }
        assert_eq!(series.score(), (3, 3));
        assert_eq!(series.winner(), None);

        series.add_result(&result(7, 3, false));
        assert_eq!(series.score(), (4, 3));
        assert_eq!(series.winner(), Some(3));
    }

    #[test]
    #[should_panic(expected = "not involved")]
    fn test_series_rejects_outsiders() {
        let mut series = PlayoffSeries::new(1, 3, 7, 4);
        series.add_result(&result(3, 5, true));
    }

    #[test]
    #[should_panic(expected = "should not be equal")]
    fn test_series_rejects_ties() {
        let mut series = PlayoffSeries::new(1, 3, 7, 4);
        let mut tie = result(3, 7, true);
        tie.away_sets = tie.home_sets;
        series.add_result(&tie);
    }

    #[test]
    fn test_long_bracket_seeds_top_against_bottom_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cup = playoff(16, 16, &mut rng);
        let first_round: Vec<&PlayoffSeries> = cup.current_series().collect();
        assert_eq!(first_round.len(), 8);
        assert_eq!(first_round[0].top, 0);
        for series in first_round {
            assert!(series.top < 8);
            assert!(series.bottom >= 8);
        }
        assert_eq!(cup.participants().len(), 16);
    }

    #[test]
    fn test_round_schedule_follows_pattern() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cup = playoff(16, 8, &mut rng);
        // gap + 7 * (match day + gap)
        assert_eq!(cup.calendar().len(), 15);

        let days: Vec<&ScheduleDay> = cup.calendar().schedule().iter().flatten().collect();
        assert_eq!(days.len(), 7);
        let series = &cup.series()[0];
        let pattern = [true, true, false, false, true, false, true];
        for (day, &top_home) in days.iter().zip(pattern.iter()) {
            let m = day.iter().find(|m| m.series == Some(0)).copied();
            let m = m.map(|m| (m.home, m.away));
            let expected = if top_home { (series.top, series.bottom) } else { (series.bottom, series.top) };
            assert_eq!(m, Some(expected));
        }
    }

    #[test]
    fn test_small_bracket_uses_top_clubs() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let cup = playoff(6, 8, &mut rng);
        let pairs: Vec<(ClubId, ClubId)> = cup.current_series().map(PlayoffSeries::pair).collect();
        assert_eq!(pairs.len(), 2);
        for (top, bottom) in pairs {
            assert!(top < 4 && bottom < 4);
        }
    }

    #[test]
    fn test_cup_runs_to_a_champion() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut clubs = clubs(16);
        let mut cup = playoff(16, 8, &mut rng);
        assert_eq!(cup.match_importance(), 2);

        let mut guard = 0;
        while !cup.is_over() {
            cup.update(&mut clubs, &mut rng);
            guard += 1;
            assert!(guard < 1000, "cup never ends");
        }

        assert_eq!(cup.round(), 3);
        assert_eq!(cup.match_importance(), 6);
        let champion = cup.champion();
        assert!(champion.is_some());
        assert!(cup.update(&mut clubs, &mut rng).is_none());

        let champion = champion.unwrap_or_default();
        assert_eq!(cup.club_fame(champion), 125 * 8);
        assert_eq!(cup.club_fame(15), 0);
        assert_eq!(cup.standings().len(), 4 + 2 + 1);
        for series in cup.series() {
            let (top, bottom) = series.score();
            assert_eq!(top.max(bottom), 4);
        }
    }

    #[test]
    fn test_decided_series_matches_are_skipped() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut clubs = clubs(8);
        let mut cup = playoff(8, 8, &mut rng);

        let mut played = 0;
        while cup.round() == 1 {
            if let Some(results) = cup.update(&mut clubs, &mut rng) {
                played += results.len();
            }
        }
        // Four series, each over after four to seven games.
        assert!((16..=28).contains(&played));
        for series in cup.series().iter().filter(|s| s.round == 1) {
            let (top, bottom) = series.score();
            assert_eq!(top + bottom, series.games().len() as u32);
            assert_eq!(top.max(bottom), 4);
        }
    }
}
