//! Single match simulation.
//!
//! A match is a sequence of sets, a set a sequence of games, a game one
//! loaded coin toss. Players tire during the match; a player whose effective
//! skill drops to zero retires and loses the match.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::probability::ProbabilityFunction;
use crate::club::ClubId;
use crate::config::MatchParams;
use crate::player::{PlayerModel, Surface};

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetStatus {
    Regular,
    HomeRetired,
    AwayRetired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResult {
    pub home_games: u32,
    pub away_games: u32,
    pub status: SetStatus,
}

impl SetResult {
    /// "6:3", "2:4 Rt:W" or "4:1 W:Rt"
    pub fn score(&self) -> String {
        let mut score = format!("{}:{}", self.home_games, self.away_games);
        match self.status {
            SetStatus::Regular => {}
            SetStatus::HomeRetired => score.push_str(" Rt:W"),
            SetStatus::AwayRetired => score.push_str(" W:Rt"),
        }
        score
    }
}

/// Immutable outcome of one match.
///
/// Player snapshots are copies taken before the match; nothing here points
/// back at the live players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_id: ClubId,
    pub away_id: ClubId,
    pub home_sets: u32,
    pub away_sets: u32,
    pub home_games: u32,
    pub away_games: u32,
    pub sets: Vec<SetResult>,
    pub full_score: String,
    pub home_stamina_lost: i64,
    pub away_stamina_lost: i64,
    pub home_exp: i64,
    pub away_exp: i64,
    pub home_reputation: i64,
    pub away_reputation: i64,
    pub exhaustion: i64,
    pub home_player: Option<PlayerModel>,
    pub away_player: Option<PlayerModel>,
    pub is_walkover: bool,
    /// Gate money of the home club, filled in by the game.
    pub income: i64,
    pub attendance: i64,
}

impl MatchResult {
    fn empty(home_id: ClubId, away_id: ClubId) -> Self {
        Self {
            home_id,
            away_id,
            home_sets: 0,
            away_sets: 0,
            home_games: 0,
            away_games: 0,
            sets: Vec::new(),
            full_score: String::new(),
            home_stamina_lost: 0,
            away_stamina_lost: 0,
            home_exp: 0,
            away_exp: 0,
            home_reputation: 0,
            away_reputation: 0,
            exhaustion: 0,
            home_player: None,
            away_player: None,
            is_walkover: false,
            income: 0,
            attendance: 0,
        }
    }

    /// Awarded match when a club has nobody to field.
    pub fn walkover(home_id: ClubId, away_id: ClubId, home_wins: bool, sets_to_win: u32) -> Self {
        let mut result = Self::empty(home_id, away_id);
        if home_wins {
            result.home_sets = sets_to_win;
        } else {
            result.away_sets = sets_to_win;
        }
        result.full_score = "W/O".to_string();
        result.is_walkover = true;
        result
    }

    pub fn home_won(&self) -> bool {
        self.home_sets > self.away_sets
    }

    pub fn winner_id(&self) -> ClubId {
        if self.home_won() {
            self.home_id
        } else {
            self.away_id
        }
    }

    pub fn loser_id(&self) -> ClubId {
        if self.home_won() {
            self.away_id
        } else {
            self.home_id
        }
    }

    pub fn involves(&self, club: ClubId) -> bool {
        self.home_id == club || self.away_id == club
    }

    fn push_set(&mut self, set: SetResult) {
        if !self.full_score.is_empty() {
            self.full_score.push(' ');
        }
        self.full_score.push_str(&set.score());
        self.home_games += set.home_games;
        self.away_games += set.away_games;
        self.sets.push(set);
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Plays matches under one ruleset.
pub struct MatchSimulator<'a> {
    params: &'a MatchParams,
    probability: &'a dyn ProbabilityFunction,
    surface: Option<Surface>,
}

impl<'a> MatchSimulator<'a> {
    /// Simulator using the probability model of the ruleset.
    pub fn new(params: &'a MatchParams) -> Self {
        Self { params, probability: &params.probability, surface: None }
    }

    pub fn with_probability(mut self, probability: &'a dyn ProbabilityFunction) -> Self {
        self.probability = probability;
        self
    }

    /// Surface of the match; players specialised on it get a bonus.
    pub fn on_surface(mut self, surface: Surface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Plays a match and applies its consequences to both players.
    pub fn play<R: Rng + ?Sized>(
        &self,
        home: &mut PlayerModel,
        away: &mut PlayerModel,
        rng: &mut R,
    ) -> MatchResult {
        let mut result = MatchResult::empty(0, 0);
        result.home_player = Some(home.clone());
        result.away_player = Some(away.clone());

        let sets_to_win = self.params.sets_to_win;
        while result.home_sets < sets_to_win && result.away_sets < sets_to_win {
            let set = self.play_set(home, away, &mut result, rng);
            result.push_set(set);

            match set.status {
                SetStatus::HomeRetired => {
                    result.home_sets = 0;
                    result.away_sets = sets_to_win;
                    break;
                }
                SetStatus::AwayRetired => {
                    result.home_sets = sets_to_win;
                    result.away_sets = 0;
                    break;
                }
                SetStatus::Regular if set.home_games > set.away_games => result.home_sets += 1,
                SetStatus::Regular => result.away_sets += 1,
            }
        }

        self.apply_consequences(home, away, &mut result, rng);
        result
    }

    fn play_set<R: Rng + ?Sized>(
        &self,
        home: &PlayerModel,
        away: &PlayerModel,
        result: &mut MatchResult,
        rng: &mut R,
    ) -> SetResult {
        let (mut home_games, mut away_games) = (0, 0);
        while !self.is_set_over(home_games, away_games) {
            let home_skill = self.effective_skill(home, result.home_stamina_lost);
            let away_skill = self.effective_skill(away, result.away_stamina_lost);

            if home_skill <= 0.0 {
                return SetResult { home_games, away_games, status: SetStatus::HomeRetired };
            }
            if away_skill <= 0.0 {
                return SetResult { home_games, away_games, status: SetStatus::AwayRetired };
            }

            let p = self.probability.home_win_probability(home_skill, away_skill);
            if rng.gen::<f64>() < p {
                home_games += 1;
            } else {
                away_games += 1;
            }

            result.home_stamina_lost += self.params.stamina_per_game;
            result.away_stamina_lost += self.params.stamina_per_game;
        }
        SetResult { home_games, away_games, status: SetStatus::Regular }
    }

    /// Technique scaled by the stamina left after `stamina_lost`, plus the
    /// speciality bonus. Zero means the player can't go on.
    pub fn effective_skill(&self, player: &PlayerModel, stamina_lost: i64) -> f64 {
        let max = player.max_stamina();
        if max <= 0 {
            return 0.0;
        }
        let stamina = player.current_stamina() - stamina_lost;
        let ratio = (stamina as f64 / max as f64).clamp(0.0, 1.0);
        let skill = player.raw_technique() as f64 * ratio;
        if skill <= 0.0 {
            return 0.0;
        }
        match self.surface {
            Some(surface) if surface == player.speciality() => skill + self.params.speciality_bonus,
            _ => skill,
        }
    }

    pub fn is_set_over(&self, home_games: u32, away_games: u32) -> bool {
        let target = self.params.games_to_win;
        (home_games >= target && home_games >= away_games + 2)
            || (away_games >= target && away_games >= home_games + 2)
    }

    fn apply_consequences<R: Rng + ?Sized>(
        &self,
        home: &mut PlayerModel,
        away: &mut PlayerModel,
        result: &mut MatchResult,
        rng: &mut R,
    ) {
        result.home_exp = PlayerModel::experience_for_win(result.home_sets, away.level());
        result.away_exp = PlayerModel::experience_for_win(result.away_sets, home.level());

        let midpoint = self.params.games_to_win / 2;
        let coefficient = self.params.reputation_coefficient;
        for set in &result.sets {
            result.home_reputation += coefficient * i64::from(set.home_games.saturating_sub(midpoint));
            result.away_reputation += coefficient * i64::from(set.away_games.saturating_sub(midpoint));
        }

        let sets_played = result.sets.len() as i64;
        result.exhaustion = self.params.exhaustion_coefficient * sets_played;

        home.add_experience(result.home_exp, rng);
        away.add_experience(result.away_exp, rng);
        home.remove_stamina_lost_in_match(result.home_stamina_lost);
        away.remove_stamina_lost_in_match(result.away_stamina_lost);
        home.add_exhaustion(result.exhaustion);
        away.add_exhaustion(result.exhaustion);
        home.add_reputation(result.home_reputation);
        away.add_reputation(result.away_reputation);
    }
}
