//! Competitions: the regular season and the cup.
//!
//! Both run on a [`Calendar`] of days; a day is either a rest day or a list
//! of scheduled matches. [`Competition`] is the variant the game holds and
//! switches at season boundaries.

pub mod championship;
pub mod playoff;
pub mod schedule;
pub mod standings;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::club::{two_clubs_mut, Club, ClubId};
use crate::config::MatchParams;
use crate::engine::{MatchResult, MatchSimulator};

pub use championship::RegularChampionship;
pub use playoff::{Playoff, PlayoffSeries};
pub use schedule::{Schedule, ScheduleDay, ScheduledMatch};
pub use standings::{SeriesSummary, Standings, StandingsRow};

// ============================================================================
// Calendar
// ============================================================================

/// Schedule, day pointer and the results of every day already played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    schedule: Schedule,
    day: usize,
    /// One entry per finished day; rest days leave an empty list.
    results: Vec<Vec<MatchResult>>,
}

impl Calendar {
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule, day: 0, results: Vec::new() }
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Today's matches; `None` on a rest day or past the end.
    pub fn current_matches(&self) -> Option<&[ScheduledMatch]> {
        self.schedule.get(self.day).and_then(|day| day.as_deref())
    }

    pub fn current_day_mut(&mut self) -> Option<&mut ScheduleDay> {
        self.schedule.get_mut(self.day).and_then(Option::as_mut)
    }

    pub fn push_day(&mut self, day: Option<ScheduleDay>) {
        self.schedule.push(day);
    }

    /// Closes today and moves to the next day.
    pub fn advance(&mut self, results: Option<Vec<MatchResult>>) {
        self.results.push(results.unwrap_or_default());
        self.day += 1;
    }

    pub fn days_results(&self) -> &[Vec<MatchResult>] {
        &self.results
    }

    /// Results of the last finished day.
    pub fn last_results(&self) -> &[MatchResult] {
        self.results.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_results(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().flatten()
    }

    /// Unplayed matches of a club, in order.
    pub fn club_schedule(&self, club: ClubId) -> Vec<ScheduledMatch> {
        schedule::club_schedule(&self.schedule, club)
    }

    /// Visits every match from today on.
    pub fn for_each_remaining_match(&mut self, mut f: impl FnMut(&mut ScheduledMatch)) {
        for day in self.schedule.iter_mut().skip(self.day).flatten() {
            day.iter_mut().for_each(&mut f);
        }
    }
}

// ============================================================================
// Match
// ============================================================================

/// Plays `home` against `away` on the home club's surface.
///
/// A club without players loses by walkover; when neither club has one the
/// away club is awarded the match.
pub fn play_match<R: Rng + ?Sized>(
    clubs: &mut [Club],
    home: ClubId,
    away: ClubId,
    rules: &MatchParams,
    rng: &mut R,
) -> MatchResult {
    let (home_club, away_club) = two_clubs_mut(clubs, home, away);
    let surface = home_club.surface();

    let mut result = match (home_club.match_player_mut(), away_club.match_player_mut()) {
        (Some(home_player), Some(away_player)) => MatchSimulator::new(rules)
            .on_surface(surface)
            .play(home_player, away_player, rng),
        (Some(_), None) => MatchResult::walkover(home, away, true, rules.sets_to_win),
        (None, _) => MatchResult::walkover(home, away, false, rules.sets_to_win),
    };
    result.home_id = home;
    result.away_id = away;
    result
}

// ============================================================================
// Competition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Competition {
    Championship(RegularChampionship),
    Playoff(Playoff),
}

impl Competition {
    pub fn title(&self) -> &'static str {
        match self {
            Competition::Championship(c) => c.title(),
            Competition::Playoff(p) => p.title(),
        }
    }

    pub fn calendar(&self) -> &Calendar {
        match self {
            Competition::Championship(c) => c.calendar(),
            Competition::Playoff(p) => p.calendar(),
        }
    }

    pub fn day(&self) -> usize {
        self.calendar().day()
    }

    pub fn is_playoff(&self) -> bool {
        matches!(self, Competition::Playoff(_))
    }

    /// Matches still to be played today.
    pub fn current_matches(&self) -> Vec<ScheduledMatch> {
        match self {
            Competition::Championship(c) => c
                .calendar()
                .current_matches()
                .map(|day| day.iter().filter(|m| !m.is_played).copied().collect())
                .unwrap_or_default(),
            Competition::Playoff(p) => p.current_matches().unwrap_or_default(),
        }
    }

    pub fn has_matches_today(&self) -> bool {
        !self.current_matches().is_empty()
    }

    /// Today's match of a club, if it plays.
    pub fn match_of(&self, club: ClubId) -> Option<ScheduledMatch> {
        self.current_matches().into_iter().find(|m| m.involves(club))
    }

    pub fn is_over(&self) -> bool {
        match self {
            Competition::Championship(c) => c.is_over(),
            Competition::Playoff(p) => p.is_over(),
        }
    }

    /// Whether the season ends once the next day is played.
    pub fn ends_season_with_next_update(&self) -> bool {
        match self {
            Competition::Championship(_) => false,
            Competition::Playoff(p) => p.ends_with_next_update(),
        }
    }

    pub fn standings(&self) -> Standings {
        match self {
            Competition::Championship(c) => Standings::Table(c.standings()),
            Competition::Playoff(p) => Standings::Bracket(p.standings()),
        }
    }

    pub fn match_importance(&self) -> i64 {
        match self {
            Competition::Championship(c) => c.match_importance(),
            Competition::Playoff(p) => p.match_importance(),
        }
    }

    pub fn club_schedule(&self, club: ClubId) -> Vec<ScheduledMatch> {
        self.calendar().club_schedule(club)
    }

    /// Fame a club earned in this competition.
    pub fn club_fame(&self, club: ClubId) -> i64 {
        match self {
            Competition::Championship(c) => c.club_fame(club),
            Competition::Playoff(p) => p.club_fame(club),
        }
    }

    pub fn last_results(&self) -> &[MatchResult] {
        self.calendar().last_results()
    }

    /// Plays the current day.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        clubs: &mut [Club],
        rng: &mut R,
    ) -> Option<Vec<MatchResult>> {
        match self {
            Competition::Championship(c) => c.update(clubs, rng),
            Competition::Playoff(p) => p.update(clubs, rng),
        }
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

    fn club(name: &str, surface: Surface) -> Club {
        Club::new(name, surface, 1, Court::new(1000, 1000))
    }

    #[test]
    fn test_calendar_advances_over_rest_days() {
        let mut calendar = Calendar::new(vec![None, Some(vec![ScheduledMatch::new(0, 1)]), None]);
        assert!(calendar.current_matches().is_none());
        calendar.advance(None);
        assert_eq!(calendar.current_matches().map(<[_]>::len), Some(1));
        assert_eq!(calendar.club_schedule(1).len(), 1);

        calendar.advance(Some(vec![MatchResult::walkover(0, 1, true, 2)]));
        assert_eq!(calendar.day(), 2);
        assert_eq!(calendar.days_results().len(), 2);
        assert_eq!(calendar.last_results().len(), 1);
        assert_eq!(calendar.all_results().count(), 1);
    }

    #[test]
    fn test_walkover_when_a_club_has_no_players() {
        let params = GameParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut clubs = vec![club("Empty", Surface::Clay), club("Full", Surface::Grass)];
        clubs[1].add_player(PlayerModel::new("A", "B", "C", 50, 50, 18, Surface::Hard));

        let result = play_match(&mut clubs, 0, 1, &params.match_rules, &mut rng);
        assert!(result.is_walkover);
        assert_eq!(result.winner_id(), 1);

        let result = play_match(&mut clubs, 1, 0, &params.match_rules, &mut rng);
        assert_eq!((result.home_id, result.away_id), (1, 0));
        assert_eq!(result.winner_id(), 1);

        clubs[1].pop_player(0);
        let result = play_match(&mut clubs, 1, 0, &params.match_rules, &mut rng);
        assert_eq!(result.winner_id(), 0);
    }

    #[test]
    fn test_played_match_sets_ids_and_tires_players() {
        let params = GameParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut clubs = vec![club("Home", Surface::Clay), club("Away", Surface::Grass)];
        for c in &mut clubs {
            c.add_player(PlayerModel::new("A", "B", "C", 50, 300, 18, Surface::Hard));
        }

        let result = play_match(&mut clubs, 1, 0, &params.match_rules, &mut rng);
        assert_eq!((result.home_id, result.away_id), (1, 0));
        assert!(!result.is_walkover);
        assert!(clubs[0].players()[0].player.current_stamina() < 300);
    }

    #[test]
    fn test_competition_delegates_to_championship() {
        let params = GameParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let championship = RegularChampionship::new(4, params.championship, params.match_rules, &mut rng);
        let competition = Competition::Championship(championship);

        assert_eq!(competition.title(), "Championship");
        assert!(!competition.is_playoff());
        assert!(!competition.has_matches_today());
        assert_eq!(competition.club_schedule(2).len(), 6);
        assert!(competition.standings().table().is_some());
        assert_eq!(competition.match_importance(), 1);
        assert!(!competition.ends_season_with_next_update());
    }
}
