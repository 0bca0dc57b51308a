//! Probability of the home player winning a single game.
//!
//! All functions are pure: effective skills in, probability out.

use serde::{Deserialize, Serialize};

/// Edge of the linear window: deltas beyond it are clamped.
pub const LINEAR_WINDOW: f64 = 50.0;
/// Probability of the weaker player when the skill gap exceeds the window.
pub const LINEAR_FLOOR: f64 = 0.05;
/// Probability of the stronger player when the skill gap exceeds the window.
pub const LINEAR_CEILING: f64 = 0.95;

/// A pluggable toss probability.
pub trait ProbabilityFunction {
    /// Probability that the home player wins the next game.
    fn home_win_probability(&self, home_skill: f64, away_skill: f64) -> f64;
}

impl<F> ProbabilityFunction for F
where
    F: Fn(f64, f64) -> f64,
{
    fn home_win_probability(&self, home_skill: f64, away_skill: f64) -> f64 {
        self(home_skill, away_skill)
    }
}

/// Serializable choice of the built-in probability functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbabilityModel {
    /// `home / (home + away)`
    Naive,
    /// `coefficient * delta + 0.5` inside the window.
    Linear { coefficient: f64 },
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        ProbabilityModel::Linear { coefficient: 0.009 }
    }
}

impl ProbabilityFunction for ProbabilityModel {
    fn home_win_probability(&self, home_skill: f64, away_skill: f64) -> f64 {
        match *self {
            ProbabilityModel::Naive => naive_probability(home_skill, away_skill),
            ProbabilityModel::Linear { coefficient } => {
                linear_probability(coefficient, home_skill, away_skill)
            }
        }
    }
}

/// Share of the home skill in the total; even odds when both are zero.
pub fn naive_probability(home_skill: f64, away_skill: f64) -> f64 {
    let total = home_skill + away_skill;
    if total <= 0.0 {
        return 0.5;
    }
    (home_skill / total).clamp(0.0, 1.0)
}

/// Grows linearly with the skill delta on `[-50, 50]`, rounded to two
/// decimals; `0.5` at parity.
pub fn linear_probability(coefficient: f64, home_skill: f64, away_skill: f64) -> f64 {
    let delta = home_skill - away_skill;
    if delta < -LINEAR_WINDOW {
        LINEAR_FLOOR
    } else if delta > LINEAR_WINDOW {
        LINEAR_CEILING
    } else {
        let p = coefficient * delta + 0.5;
        ((p * 100.0).round() / 100.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_linear_probability_window() {
        assert!((linear_probability(0.009, 50.0, 50.0) - 0.5).abs() < EPS);
        assert!((linear_probability(0.009, 100.0, 50.0) - 0.95).abs() < EPS);
        assert!((linear_probability(0.009, 50.0, 100.0) - 0.05).abs() < EPS);
        assert!((linear_probability(0.009, 60.0, 50.0) - 0.59).abs() < EPS);
    }

    #[test]
    fn test_linear_probability_is_clamped_outside_window() {
        assert_eq!(linear_probability(0.009, 200.0, 0.0), LINEAR_CEILING);
        assert_eq!(linear_probability(0.009, 0.0, 200.0), LINEAR_FLOOR);
    }

    #[test]
    fn test_naive_probability() {
        assert!((naive_probability(30.0, 10.0) - 0.75).abs() < EPS);
        assert_eq!(naive_probability(0.0, 0.0), 0.5);
    }

    #[test]
    fn test_closures_are_probability_functions() {
        let always_home = |_: f64, _: f64| 1.0;
        assert_eq!(always_home.home_win_probability(1.0, 99.0), 1.0);

        let model = ProbabilityModel::Naive;
        assert!((model.home_win_probability(1.0, 3.0) - 0.25).abs() < EPS);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every model yields a probability, and a stronger home
            /// player never gets worse odds.
            #[test]
            fn prop_linear_is_monotonic(home in 0.0f64..150.0, away in 0.0f64..150.0, bump in 0.0f64..20.0) {
                let p = linear_probability(0.009, home, away);
                let q = linear_probability(0.009, home + bump, away);
                prop_assert!((0.0..=1.0).contains(&p));
                prop_assert!(q + EPS >= p);
            }
        }
    }
}
