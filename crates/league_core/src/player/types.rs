use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::constants::{
    ENDURANCE_FACTOR, EXPERIENCE_COEFFICIENT, EXPERIENCE_LEVEL_FACTOR, SKILL_GROWTH_PER_LEVEL,
};
use crate::error::GameError;

/// Court surface: a club's home surface and a player's speciality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Clay,
    Grass,
    Hard,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Clay, Surface::Grass, Surface::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Hard => "hard",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clay" => Ok(Surface::Clay),
            "grass" => Ok(Surface::Grass),
            "hard" => Ok(Surface::Hard),
            _ => Err(GameError::UnknownSurface { surface: s.to_string() }),
        }
    }
}

/// Total experience required to reach `level`.
///
/// Triangular ladder: every next level costs one more experience step.
pub fn level_exp(level: u32) -> i64 {
    let n = i64::from(level);
    n * (n + 1) / 2 * EXPERIENCE_COEFFICIENT
}

fn round_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A tennis player.
///
/// Skills are stored as raw integers (50 means an average player) and shown
/// divided by ten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerModel {
    first_name: String,
    second_name: String,
    last_name: String,
    technique: i64,
    endurance: i64,
    age: u32,
    speciality: Surface,
    current_stamina: i64,
    exhaustion: i64,
    experience: i64,
    reputation: i64,
}

impl PlayerModel {
    pub fn new(
        first_name: impl Into<String>,
        second_name: impl Into<String>,
        last_name: impl Into<String>,
        technique: i64,
        endurance: i64,
        age: u32,
        speciality: Surface,
    ) -> Self {
        let mut player = Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
            last_name: last_name.into(),
            technique,
            endurance,
            age,
            speciality,
            current_stamina: 0,
            exhaustion: 0,
            experience: 0,
            reputation: 0,
        };
        player.current_stamina = player.max_stamina();
        player
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn second_name(&self) -> &str {
        &self.second_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "F. S. Last"
    pub fn initials(&self) -> String {
        let first = self.first_name.chars().next().unwrap_or('?');
        let second = self.second_name.chars().next().unwrap_or('?');
        format!("{}. {}. {}", first, second, self.last_name)
    }

    pub fn raw_technique(&self) -> i64 {
        self.technique
    }

    pub fn raw_endurance(&self) -> i64 {
        self.endurance
    }

    pub fn technique(&self) -> f64 {
        round_1(self.technique as f64 / 10.0)
    }

    pub fn endurance(&self) -> f64 {
        round_1(self.endurance as f64 / 10.0)
    }

    /// Share of stamina left, in `[0, 1]`.
    pub fn stamina_ratio(&self) -> f64 {
        let max = self.max_stamina();
        if max <= 0 {
            return 0.0;
        }
        (self.current_stamina as f64 / max as f64).clamp(0.0, 1.0)
    }

    /// Displayed technique scaled by the stamina the player has left.
    pub fn actual_technique(&self) -> f64 {
        round_1(self.technique as f64 * self.stamina_ratio() / 10.0)
    }

    pub fn max_stamina(&self) -> i64 {
        self.endurance * ENDURANCE_FACTOR
    }

    pub fn current_stamina(&self) -> i64 {
        self.current_stamina
    }

    pub fn exhaustion(&self) -> i64 {
        self.exhaustion
    }

    pub fn experience(&self) -> i64 {
        self.experience
    }

    pub fn reputation(&self) -> i64 {
        self.reputation
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn speciality(&self) -> Surface {
        self.speciality
    }

    pub fn level(&self) -> u32 {
        let mut level = 0;
        while level_exp(level) < self.experience {
            level += 1;
        }
        level
    }

    pub fn next_level_exp(&self) -> i64 {
        level_exp(self.level() + 1)
    }

    /// Ranking used when the AI picks a player for a match.
    pub fn selection_score(&self) -> f64 {
        self.actual_technique() * 1.2 + self.endurance()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds experience and applies one skill growth per gained level.
    ///
    /// Returns the number of levels gained.
    pub fn add_experience<R: Rng + ?Sized>(&mut self, experience: i64, rng: &mut R) -> u32 {
        let old_level = self.level();
        self.experience += experience;
        let new_level = self.level();

        for _ in old_level..new_level {
            if rng.gen_bool(0.5) {
                self.technique += SKILL_GROWTH_PER_LEVEL;
            } else {
                self.endurance += SKILL_GROWTH_PER_LEVEL;
            }
        }
        new_level.saturating_sub(old_level)
    }

    pub fn add_exhaustion(&mut self, value: i64) {
        self.exhaustion += value;
    }

    pub fn add_reputation(&mut self, value: i64) {
        self.reputation += value;
    }

    pub fn recover_stamina(&mut self, recovered: i64) {
        self.current_stamina = (self.current_stamina + recovered).min(self.max_stamina());
    }

    pub fn remove_stamina_lost_in_match(&mut self, lost: i64) {
        self.current_stamina -= lost;
    }

    pub fn age_up(&mut self) {
        self.age += 1;
    }

    /// Full reset at the season close.
    pub fn after_season_rest(&mut self) {
        self.exhaustion = 0;
        self.current_stamina = self.max_stamina();
    }

    /// Experience for winning `sets_won` sets against an opponent of
    /// `opponent_level`.
    pub fn experience_for_win(sets_won: u32, opponent_level: u32) -> i64 {
        let base = EXPERIENCE_COEFFICIENT * i64::from(sets_won);
        let percent = 100 + EXPERIENCE_LEVEL_FACTOR * i64::from(opponent_level);
        (base * percent + 50) / 100
    }
}
