//! # league_core - Tennis Club League Simulation Engine
//!
//! A turn-based, multi-season league of tennis clubs: a round-robin
//! championship followed by a best-of-N playoff every season, stochastic
//! match simulation, player growth and per-club finances.
//!
//! ## Features
//! - Deterministic: every game owns a seeded `ChaCha8Rng`
//! - One manager-controlled club, the rest run by the AI
//! - Snapshots through a type registry (MessagePack + LZ4 + SHA-256)
//!
//! ## Example
//! ```rust,no_run
//! use league_core::{Game, GameParams};
//!
//! let mut game = Game::new(GameParams::default(), "demo", 0, 42).unwrap();
//! let context = game.context(0).unwrap();
//! println!("{} on day {}", context.club_name, context.day);
//! game.update().ok();
//! ```

// Game APIs often take several ids and indices
#![allow(clippy::too_many_arguments)]
// Competition variants carry whole schedules
#![allow(clippy::large_enum_variant)]

pub mod club;
pub mod competition;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod game;
pub mod player;
pub mod save;
pub mod serialization;

pub use club::{Club, ClubId, Court, FinancialAccount, PlayerSlot, Transaction};
pub use competition::{Competition, Standings, StandingsRow};
pub use config::GameParams;
pub use engine::{MatchResult, MatchSimulator, ProbabilityModel};
pub use error::{ConfigError, GameError, GameResult};
pub use game::{DayResultRow, Game, GameContext, OpponentInfo};
pub use player::{PlayerModel, Surface};
pub use save::{DirectoryStore, GameRepository, MemoryStore, SaveError, SnapshotStore};
pub use serialization::{DecodeError, EncodeError, Jsonable, Registry};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
