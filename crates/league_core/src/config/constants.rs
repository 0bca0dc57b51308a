//! Gameplay constants shared by every game session.
//!
//! Values that the balance designers tune per session live in
//! [`GameParams`](super::GameParams); the ones here define the rules of the
//! world itself.

/// Age at which a rookie enters the league.
pub const STARTING_AGE: u32 = 16;

/// A player who reaches this age retires at the season rollover.
pub const RETIREMENT_AGE: u32 = 21;

/// Base experience for one won set, also the step of the level ladder.
pub const EXPERIENCE_COEFFICIENT: i64 = 50;

/// Extra experience (percent) per level of the beaten opponent.
pub const EXPERIENCE_LEVEL_FACTOR: i64 = 5;

/// Technique or endurance gained on each level-up.
pub const SKILL_GROWTH_PER_LEVEL: i64 = 5;

/// Maximum stamina per point of endurance.
pub const ENDURANCE_FACTOR: i64 = 1;

/// Mean of the gaussian used for base skills of generated players.
pub const SKILL_MEAN: f64 = 50.0;

/// Standard deviation of generated base skills.
pub const SKILL_DEVIATION: f64 = 25.0;

/// Upper bound of generated base skills.
pub const SKILL_MAX: f64 = 100.0;

/// Rookie hired by the AI when every rostered player is weaker than this.
pub const AI_HIRE_TECHNIQUE_THRESHOLD: f64 = 5.0;

/// Selectable coach levels (index == level).
pub const COACH_LEVELS: [u8; 4] = [0, 1, 2, 3];

/// Number of seasons remembered by a club's fame tracker.
pub const FAME_WINDOW: usize = 5;

/// Weights of the fame window, oldest season first.
pub const FAME_WEIGHTS: [f64; FAME_WINDOW] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// Title of the regular season competition.
pub const CHAMPIONSHIP_TITLE: &str = "Championship";

/// Title of the playoff competition that closes a season.
pub const CUP_TITLE: &str = "Cup";

/// Name of the court every club starts on.
pub const DEFAULT_COURT: &str = "default";
