//! Regular season: a shuffled double round robin with rest days.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::schedule::make_round_robin_schedule;
use super::standings::{compute_table, position_of, StandingsRow};
use super::{play_match, Calendar};
use crate::club::{Club, ClubId};
use crate::config::constants::CHAMPIONSHIP_TITLE;
use crate::config::{ChampionshipParams, MatchParams};
use crate::engine::MatchResult;

/// Positions from this one on cost fame.
const FAME_PENALTY_START: usize = 10;
const FAME_PENALTY_STEP: i64 = -50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularChampionship {
    params: ChampionshipParams,
    match_rules: MatchParams,
    club_count: usize,
    calendar: Calendar,
}

impl RegularChampionship {
    pub fn new<R: Rng + ?Sized>(
        club_count: usize,
        params: ChampionshipParams,
        match_rules: MatchParams,
        rng: &mut R,
    ) -> Self {
        let ids: Vec<ClubId> = (0..club_count).collect();
        let schedule = make_round_robin_schedule(
            &ids,
            params.inter_division_rounds(),
            params.intra_division_rounds(),
            params.recovery_day,
            rng,
        );
        Self { params, match_rules, club_count, calendar: Calendar::new(schedule) }
    }

    pub fn title(&self) -> &'static str {
        CHAMPIONSHIP_TITLE
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn is_over(&self) -> bool {
        self.calendar.day() >= self.calendar.len()
    }

    pub fn match_importance(&self) -> i64 {
        self.params.match_importance
    }

    pub fn standings(&self) -> Vec<StandingsRow> {
        compute_table(self.club_count, self.calendar.all_results())
    }

    /// Bottom of the table loses fame, quadratically with the distance from
    /// the cut.
    pub fn club_fame(&self, club: ClubId) -> i64 {
        let standings = self.standings();
        let Some(position) = position_of(&standings, club) else {
            return 0;
        };
        let y = position.saturating_sub(FAME_PENALTY_START) as i64;
        FAME_PENALTY_STEP * (y * (y - 1) / 2)
    }

    /// Plays the current day. Rest days just move the calendar.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        clubs: &mut [Club],
        rng: &mut R,
    ) -> Option<Vec<MatchResult>> {
        let Some(matches) = self.calendar.current_day_mut() else {
            self.calendar.advance(None);
            return None;
        };

        let mut day_results = Vec::with_capacity(matches.len());
        for scheduled in matches.iter_mut() {
            let result = play_match(clubs, scheduled.home, scheduled.away, &self.match_rules, rng);
            scheduled.is_played = true;
            day_results.push(result);
        }
        self.calendar.advance(Some(day_results.clone()));
        Some(day_results)
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

    fn clubs(n: usize) -> Vec<Club> {
        (0..n)
            .map(|i| {
                let mut club = Club::new(format!("Club {}", i), Surface::Hard, 1, Court::new(1000, 1000));
                club.add_player(PlayerModel::new("A", "B", "C", 50, 400, 18, Surface::Hard));
                club
            })
            .collect()
    }

    fn championship(n: usize, rng: &mut ChaCha8Rng) -> RegularChampionship {
        let params = GameParams::default();
        RegularChampionship::new(n, params.championship, params.match_rules, rng)
    }

    #[test]
    fn test_full_season_plays_every_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut clubs = clubs(4);
        let mut championship = championship(4, &mut rng);
        let days = championship.calendar().len();

        let mut played = 0;
        for _ in 0..days {
            assert!(!championship.is_over());
            if let Some(results) = championship.update(&mut clubs, &mut rng) {
                played += results.len();
            }
        }
        assert!(championship.is_over());
        assert_eq!(played, 4 * 3);
        assert!(championship.calendar().club_schedule(0).is_empty());

        let standings = championship.standings();
        let total_wins: u32 = standings.iter().map(|row| row.matches_won).sum();
        assert_eq!(total_wins, 12);
    }

    #[test]
    fn test_first_day_is_rest() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut clubs = clubs(4);
        let mut championship = championship(4, &mut rng);
        assert!(championship.calendar().current_matches().is_none());
        assert!(championship.update(&mut clubs, &mut rng).is_none());
        assert_eq!(championship.calendar().day(), 1);
    }

    #[test]
    fn test_fame_penalty_for_bottom_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let championship = championship(16, &mut rng);
        // Nothing played: the table is in club order.
        assert_eq!(championship.club_fame(0), 0);
        assert_eq!(championship.club_fame(11), 0);
        assert_eq!(championship.club_fame(12), -50);
        assert_eq!(championship.club_fame(15), -50 * 10);
    }
}
