//! Read-only view of the game for one club.
//!
//! Front-ends depend on [`GameContext`] only; it owns copies of everything
//! so it can outlive the borrow of the game.

use serde::{Deserialize, Serialize};

use super::{Game, SeasonHistory, LATEST_TRANSACTIONS};
use crate::club::{ClubId, Court, Transaction};
use crate::competition::{ScheduledMatch, Standings};
use crate::engine::MatchResult;
use crate::error::GameResult;
use crate::player::{PlayerModel, Surface};

/// Who a club meets today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentInfo {
    pub club_name: String,
    pub match_surface: Surface,
    /// Expected opponent player, known for home matches only.
    pub player: Option<PlayerModel>,
    pub fame: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub index: usize,
    pub player: PlayerModel,
    pub level: u32,
    pub coach_level: u8,
    pub has_next_contract: bool,
    pub contract_price: i64,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeAgentInfo {
    pub index: usize,
    pub player: PlayerModel,
    pub level: u32,
    pub price: i64,
}

/// One line of the day's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResultRow {
    pub home_club: String,
    pub away_club: String,
    pub home_player: Option<String>,
    pub away_player: Option<String>,
    pub score: String,
    pub attendance: i64,
    pub income: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub game_id: String,
    pub season: usize,
    pub day: usize,
    pub title: String,
    pub club_id: ClubId,
    pub club_name: String,
    pub balance: i64,
    pub latest_transactions: Vec<Transaction>,
    pub court: Court,
    pub practice_cost: i64,
    pub players: Vec<PlayerInfo>,
    pub free_agents: Vec<FreeAgentInfo>,
    pub opponent: Option<OpponentInfo>,
    pub remaining_matches: Vec<ScheduledMatch>,
    pub standings: Standings,
    pub history: Vec<SeasonHistory>,
    pub last_results: Vec<DayResultRow>,
    pub clubs: Vec<String>,
    pub has_matches_today: bool,
}

impl Game {
    pub fn context(&self, club_id: ClubId) -> GameResult<GameContext> {
        let club = self.club(club_id)?;
        let selected = club.selected_index();

        let players = club
            .players()
            .iter()
            .enumerate()
            .map(|(index, slot)| PlayerInfo {
                index,
                player: slot.player.clone(),
                level: slot.player.level(),
                coach_level: slot.coach_level,
                has_next_contract: slot.has_next_contract,
                contract_price: self.params.contract_price(slot.player.level()),
                is_selected: selected == Some(index),
            })
            .collect();

        let free_agents = self
            .free_agents
            .iter()
            .enumerate()
            .map(|(index, player)| FreeAgentInfo {
                index,
                player: player.clone(),
                level: player.level(),
                price: self.params.contract_price(player.level()),
            })
            .collect();

        Ok(GameContext {
            game_id: self.game_id.clone(),
            season: self.season(),
            day: self.day(),
            title: self.competition.title().to_string(),
            club_id,
            club_name: club.name().to_string(),
            balance: club.balance(),
            latest_transactions: club.account().latest_transactions(LATEST_TRANSACTIONS).to_vec(),
            court: *club.court(),
            practice_cost: self.practice_cost(club),
            players,
            free_agents,
            opponent: self.opponent(club_id),
            remaining_matches: self.competition.club_schedule(club_id),
            standings: self.competition.standings(),
            history: self.history.clone(),
            last_results: self.day_result_rows(),
            clubs: self.clubs.iter().map(|club| club.name().to_string()).collect(),
            has_matches_today: self.competition.has_matches_today(),
        })
    }

    /// Last day's results with names resolved.
    pub fn day_result_rows(&self) -> Vec<DayResultRow> {
        self.last_results.iter().map(|result| self.result_row(result)).collect()
    }

    fn result_row(&self, result: &MatchResult) -> DayResultRow {
        let club_name = |id: ClubId| {
            self.clubs.get(id).map(|club| club.name().to_string()).unwrap_or_default()
        };
        DayResultRow {
            home_club: club_name(result.home_id),
            away_club: club_name(result.away_id),
            home_player: result.home_player.as_ref().map(PlayerModel::initials),
            away_player: result.away_player.as_ref().map(PlayerModel::initials),
            score: result.full_score.clone(),
            attendance: result.attendance,
            income: result.income,
        }
    }
}
