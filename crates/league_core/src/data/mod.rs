//! Embedded seed data: the default league roster.
//!
//! `data/clubs.json` is a JSON array of clubs; nested player and slot
//! objects carry registry type markers (`{"PlayerModel": true, ...}`).

use serde::{Deserialize, Serialize};

use crate::club::{Club, Court, Transaction};
use crate::player::{PlayerModel, Surface};
use crate::serialization::{DecodeError, Registry};

/// Default roster, embedded at compile time.
pub const DEFAULT_CLUBS_JSON: &str = include_str!("../../data/clubs.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSeed {
    pub player: PlayerModel,
    pub has_next_contract: bool,
}

/// One club of the seed roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubSeed {
    pub name: String,
    pub surface: Surface,
    pub coach_power: u8,
    /// Fame of past seasons, oldest first.
    #[serde(default)]
    pub fame: Vec<i64>,
    pub balance: i64,
    #[serde(default)]
    pub player_data: Vec<SlotSeed>,
}

impl ClubSeed {
    /// Builds the club on the given court.
    pub fn build(&self, court: Court) -> Club {
        let mut club = Club::new(self.name.clone(), self.surface, self.coach_power, court);
        for &fame in &self.fame {
            club.add_fame(fame);
        }
        for (index, slot) in self.player_data.iter().enumerate() {
            club.add_player(slot.player.clone());
            if slot.has_next_contract {
                club.contract_player(index);
            }
        }
        if self.balance < 0 {
            tracing::warn!(club = %self.name, balance = self.balance, "Club starts in debt");
        }
        club.account_mut().apply_adjustment(Transaction::new(self.balance, "Initial balance"));
        club
    }
}

/// Parses a roster file, validating every type marker against the registry.
pub fn parse_club_seeds(registry: &Registry, text: &str) -> Result<Vec<ClubSeed>, DecodeError> {
    let mut value: serde_json::Value = serde_json::from_str(text)?;
    registry.strip_markers(&mut value)?;
    Ok(serde_json::from_value(value)?)
}

pub fn default_club_seeds() -> Vec<ClubSeed> {
    // Embedded at compile time, a parse failure is a build defect.
    parse_club_seeds(&Registry::with_domain_types(), DEFAULT_CLUBS_JSON)
        .expect("Failed to parse data/clubs.json")
}
