//! Match engine: game probability functions and the match simulator.

pub mod match_sim;
pub mod probability;

pub use match_sim::{MatchResult, MatchSimulator, SetResult, SetStatus};
pub use probability::{
    linear_probability, naive_probability, ProbabilityFunction, ProbabilityModel,
};
