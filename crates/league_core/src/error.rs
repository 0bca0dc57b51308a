use thiserror::Error;

/// Validation failure of a public game operation.
///
/// Returned before anything is mutated: a failed call leaves the game as it
/// was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Incorrect club index: {club}")]
    UnknownClub { club: usize },

    #[error("{reason}")]
    InvalidParams { reason: String },

    #[error("A league needs at least two clubs, got {count}")]
    NotEnoughClubs { count: usize },

    #[error("There is no player #{player} in club #{club}")]
    UnknownPlayer { club: usize, player: usize },

    #[error("There is no free agent #{index}")]
    UnknownFreeAgent { index: usize },

    #[error("Incorrect coach index: {index} (choices are 0..={max})")]
    UnknownCoach { index: usize, max: usize },

    #[error("Incorrect court type '{court}' (choices are {choices})")]
    UnknownCourt { court: String, choices: String },

    #[error("You can't choose '{surface}' as speciality (choices are clay|grass|hard)")]
    UnknownSurface { surface: String },

    #[error("Insufficient funds: you need at least ${required}, you have ${available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("{player} already has a contract for the next season")]
    AlreadyContracted { player: String },

    #[error("{player} is too old to play next season")]
    TooOldForContract { player: String },

    #[error("Ticket price can't be negative: {price}")]
    NegativeTicketPrice { price: i64 },

    #[error("You have to select a player for the next match")]
    DecisionRequired,

    #[error("You have insufficient funds to play on this court")]
    CourtRentUnaffordable,

    #[error("You have insufficient funds to perform such kind of practice")]
    PracticeUnaffordable,

    #[error("Your club has uncontracted players: sign or fire them before the season ends")]
    UnresolvedContracts,
}

impl GameError {
    /// Errors the manager can fix by spending money or changing the roster.
    pub fn is_financial(&self) -> bool {
        matches!(
            self,
            GameError::InsufficientFunds { .. }
                | GameError::CourtRentUnaffordable
                | GameError::PracticeUnaffordable
        )
    }
}

/// Failure to load or validate [`GameParams`](crate::config::GameParams).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid parameters: {0}")]
    Invalid(String),
}

pub type GameResult<T> = std::result::Result<T, GameError>;
