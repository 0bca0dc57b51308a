//! # Game Parameters
//!
//! Everything a session can tune: attendance model, competition rules,
//! match rules, the courts catalog and contract prices.
//!
//! ## Usage
//! ```rust
//! use league_core::config::GameParams;
//!
//! let params = GameParams::default();
//! assert!(params.validate().is_ok());
//! ```
//!
//! Parameters are plain YAML (see `data/params.yaml`, which is also what
//! [`GameParams::default`] returns).

pub mod constants;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::club::court::Court;
use crate::engine::probability::ProbabilityModel;
use crate::error::ConfigError;

/// Default parameters, embedded at compile time.
pub const DEFAULT_PARAMS_YAML: &str = include_str!("../../data/params.yaml");

// =============================================================================
// Parameter groups
// =============================================================================

/// Coefficients of the attendance model.
///
/// `attendance = price * ticket_price^p + home_fame * home + away_fame * away
///   + reputation * player_reputation + importance * match_importance`
/// where `p` is 2 in hard mode and 1 otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceParams {
    pub price: f64,
    pub home_fame: f64,
    pub away_fame: f64,
    pub reputation: f64,
    pub importance: f64,
}

/// Regular season rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionshipParams {
    /// Every `recovery_day`-th day is a rest day (2 or more).
    pub recovery_day: usize,
    /// Meetings per pairing on inter-division canonical days.
    pub rounds: usize,
    /// Meetings per pairing on intra-division canonical days.
    #[serde(default)]
    pub intra_division_rounds: Option<usize>,
    pub match_importance: i64,
}

impl ChampionshipParams {
    pub fn inter_division_rounds(&self) -> usize {
        self.rounds
    }

    pub fn intra_division_rounds(&self) -> usize {
        self.intra_division_rounds.unwrap_or(self.rounds)
    }
}

/// Cup (playoff) rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffParams {
    /// `true` means the top seed plays at home.
    pub series_matches_pattern: Vec<bool>,
    /// Number of clubs in the bracket, a power of two.
    pub length: usize,
    pub gap_days: usize,
    pub match_importance: i64,
    /// Fame of a participant is `fame_base * 2^series_won`.
    #[serde(default = "default_cup_fame_base")]
    pub fame_base: i64,
}

fn default_cup_fame_base() -> i64 {
    125
}

impl PlayoffParams {
    /// Series wins needed to take a series.
    pub fn matches_to_win(&self) -> usize {
        self.series_matches_pattern.len() / 2 + 1
    }
}

/// Rules of a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    pub games_to_win: u32,
    pub sets_to_win: u32,
    /// Added to the effective skill of a player on their speciality surface.
    pub speciality_bonus: f64,
    /// Exhaustion gained per set played.
    pub exhaustion_coefficient: i64,
    /// Reputation gained per game won above the middle of a set.
    pub reputation_coefficient: i64,
    pub stamina_per_game: i64,
    pub probability: ProbabilityModel,
}

/// Catalog entry of a court type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtSpec {
    pub capacity: i64,
    pub rent_cost: i64,
}

impl CourtSpec {
    /// A fresh court of this type with a zero ticket price.
    pub fn build(&self) -> Court {
        Court::new(self.capacity, self.rent_cost)
    }
}

/// How contract prices grow with player level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractPricing {
    /// Price per level; levels past the end cost the most expensive entry.
    Static { prices: Vec<i64> },
    /// `coefficient * (level + 1)^2`
    Quadratic { coefficient: i64 },
}

impl ContractPricing {
    pub fn price(&self, level: u32) -> i64 {
        match self {
            ContractPricing::Static { prices } => prices
                .get(level as usize)
                .copied()
                .unwrap_or_else(|| prices.iter().copied().max().unwrap_or(0)),
            ContractPricing::Quadratic { coefficient } => {
                let step = i64::from(level) + 1;
                coefficient * step * step
            }
        }
    }
}

// =============================================================================
// GameParams
// =============================================================================

/// All parameters of one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameParams {
    pub attendance: AttendanceParams,
    pub championship: ChampionshipParams,
    pub playoff: PlayoffParams,
    pub match_rules: MatchParams,
    pub courts: BTreeMap<String, CourtSpec>,
    pub contracts: ContractPricing,
    pub exhaustion_factor: i64,
    pub is_hard: bool,
    pub training_coefficient: i64,
    pub years_to_simulate: usize,
}

impl Default for GameParams {
    fn default() -> Self {
        // Embedded at compile time, a parse failure is a build defect.
        serde_yaml::from_str(DEFAULT_PARAMS_YAML).expect("Failed to parse data/params.yaml")
    }
}

impl GameParams {
    /// Parse and validate parameters from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let params: GameParams = serde_yaml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.championship.recovery_day < 2 {
            return invalid("championship.recovery_day must be at least 2");
        }
        for rounds in [
            self.championship.inter_division_rounds(),
            self.championship.intra_division_rounds(),
        ] {
            if rounds == 0 || rounds % 2 != 0 {
                return invalid("championship rounds must be positive and even");
            }
        }

        if self.playoff.length < 2 || !self.playoff.length.is_power_of_two() {
            return invalid("playoff.length must be a power of two, at least 2");
        }
        let pattern = self.playoff.series_matches_pattern.len();
        if pattern == 0 || pattern % 2 == 0 {
            return invalid("playoff.series_matches_pattern must have an odd length");
        }

        if self.match_rules.games_to_win == 0 || self.match_rules.sets_to_win == 0 {
            return invalid("match_rules.games_to_win and sets_to_win must be positive");
        }
        if self.match_rules.stamina_per_game < 0 {
            return invalid("match_rules.stamina_per_game can't be negative");
        }

        if let ContractPricing::Static { prices } = &self.contracts {
            if prices.is_empty() {
                return invalid("contracts.prices can't be empty");
            }
        }

        if !self.courts.contains_key(constants::DEFAULT_COURT) {
            return invalid("courts must contain a 'default' entry");
        }

        Ok(())
    }

    /// Catalog entry of the court every club starts on.
    pub fn default_court(&self) -> CourtSpec {
        self.courts
            .get(constants::DEFAULT_COURT)
            .copied()
            .unwrap_or(CourtSpec { capacity: 0, rent_cost: 0 })
    }

    pub fn contract_price(&self, level: u32) -> i64 {
        self.contracts.price(level)
    }

    /// Practice cost of one player for a day.
    pub fn practice_price(&self, player_level: u32, coach_level: u8) -> i64 {
        let coach = i64::from(coach_level);
        self.training_coefficient * i64::from(player_level) * coach * coach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = GameParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.playoff.matches_to_win(), 4);
        assert!(params.courts.contains_key("huge"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let params = GameParams::default();
        let text = params.to_yaml_string().unwrap();
        let restored = GameParams::from_yaml_str(&text).unwrap();
        assert_eq!(params, restored);
    }

    #[test]
    fn test_static_contract_prices_saturate() {
        let pricing = ContractPricing::Static { prices: vec![10, 20, 40] };
        assert_eq!(pricing.price(0), 10);
        assert_eq!(pricing.price(2), 40);
        assert_eq!(pricing.price(9), 40);
    }

    #[test]
    fn test_quadratic_contract_prices() {
        let pricing = ContractPricing::Quadratic { coefficient: 100 };
        assert_eq!(pricing.price(0), 100);
        assert_eq!(pricing.price(2), 900);
    }

    #[test]
    fn test_validation_rejects_bad_bracket() {
        let mut params = GameParams::default();
        params.playoff.length = 6;
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        let mut params = GameParams::default();
        params.playoff.series_matches_pattern = vec![true, false];
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_recovery_day() {
        let mut params = GameParams::default();
        params.championship.recovery_day = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_practice_price_is_quadratic_in_coach_level() {
        let params = GameParams { training_coefficient: 10, ..GameParams::default() };
        assert_eq!(params.practice_price(3, 0), 0);
        assert_eq!(params.practice_price(3, 2), 120);
    }
}
