//! Random player generation for rookies, free agents and AI backfill.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::types::{level_exp, PlayerModel, Surface};
use crate::config::constants::{SKILL_DEVIATION, SKILL_MAX, SKILL_MEAN};

const FIRST_NAMES: &[&str] = &[
    "Alex", "Ben", "Callum", "Daniel", "Ethan", "Finn", "George", "Harry", "Isaac", "Jack",
    "Kieran", "Liam", "Mason", "Nathan", "Oliver", "Patrick", "Quinn", "Riley", "Samuel",
    "Thomas", "Vincent", "William", "Xavier", "Zachary",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Campbell", "Dawson", "Edwards", "Fletcher", "Graham", "Hughes",
    "Irving", "Johnson", "Kelly", "Lawson", "Mitchell", "Nolan", "O'Brien", "Parker", "Reid",
    "Stewart", "Taylor", "Walsh", "Young",
];

/// Creates players with gaussian base skills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerFactory {
    pub skill_mean: f64,
    pub skill_deviation: f64,
}

impl Default for PlayerFactory {
    fn default() -> Self {
        Self { skill_mean: SKILL_MEAN, skill_deviation: SKILL_DEVIATION }
    }
}

impl PlayerFactory {
    /// Creates a player at `level`; every level is grown through the regular
    /// level-up rule, so two players of the same level differ.
    pub fn create_player<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        level: u32,
        age: u32,
        speciality: Option<Surface>,
    ) -> PlayerModel {
        let speciality = speciality.unwrap_or_else(|| Surface::random(rng));
        let technique = self.base_skill(rng);
        let endurance = self.base_skill(rng);

        let first = pick(rng, FIRST_NAMES);
        let second = pick(rng, FIRST_NAMES);
        let last = pick(rng, LAST_NAMES);

        let mut player = PlayerModel::new(first, second, last, technique, endurance, age, speciality);
        player.add_experience(level_exp(level), rng);
        player.after_season_rest();
        player
    }

    fn base_skill<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let sample = Normal::new(self.skill_mean, self.skill_deviation)
            .map(|distribution| distribution.sample(rng))
            .unwrap_or(self.skill_mean);
        sample.abs().clamp(1.0, SKILL_MAX).round() as i64
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, names: &[&str]) -> String {
    names.choose(rng).copied().unwrap_or("Anonymous").to_string()
}
