//! Player module
//!
//! - `PlayerModel`: skills, stamina, experience ladder and reputation
//! - `PlayerFactory`: random rookies and free agents
//! - `ExhaustedLinearRecovery`: daily stamina recovery

pub mod factory;
pub mod recovery;
pub mod types;

pub use factory::PlayerFactory;
pub use recovery::ExhaustedLinearRecovery;
pub use types::{level_exp, PlayerModel, Surface};
