//! Manager operations.
//!
//! Every operation validates all of its inputs before touching the game: an
//! `Err` means nothing changed.

use super::Game;
use crate::club::{ClubId, Transaction};
use crate::config::constants::{COACH_LEVELS, RETIREMENT_AGE, STARTING_AGE};
use crate::error::{GameError, GameResult};
use crate::player::{PlayerFactory, PlayerModel, Surface};

impl Game {
    fn check_player(&self, club: ClubId, player: usize) -> GameResult<()> {
        let roster = self.club(club)?.players();
        if player >= roster.len() {
            return Err(GameError::UnknownPlayer { club, player });
        }
        Ok(())
    }

    fn check_funds(&self, club: ClubId, required: i64) -> GameResult<()> {
        let available = self.club(club)?.balance();
        if available < required {
            return Err(GameError::InsufficientFunds { required, available });
        }
        Ok(())
    }

    /// Releases a player to the free-agent pool, fully rested.
    pub fn fire_player(&mut self, club: ClubId, player: usize) -> GameResult<()> {
        self.check_player(club, player)?;

        let mut fired = self.clubs[club].pop_player(player);
        fired.recover_stamina(fired.max_stamina());
        tracing::debug!(club = %self.clubs[club].name(), player = %fired.initials(), "Player fired");
        self.free_agents.push(fired);
        Ok(())
    }

    /// Hires a level 0 rookie with the given speciality.
    pub fn hire_new_player(&mut self, club: ClubId, surface: &str) -> GameResult<()> {
        let speciality: Surface = surface.parse()?;
        self.check_funds(club, self.params.contract_price(0))?;

        let player = PlayerFactory::default().create_player(
            &mut self.rng,
            0,
            STARTING_AGE,
            Some(speciality),
        );
        self.process_player_hire(club, player);
        Ok(())
    }

    pub fn hire_free_agent(&mut self, club: ClubId, agent: usize) -> GameResult<()> {
        self.club(club)?;
        let Some(player) = self.free_agents.get(agent) else {
            return Err(GameError::UnknownFreeAgent { index: agent });
        };
        self.check_funds(club, self.params.contract_price(player.level()))?;

        let player = self.free_agents.remove(agent);
        self.process_player_hire(club, player);
        Ok(())
    }

    /// Adds a validated hire to the roster and pays the contract.
    fn process_player_hire(&mut self, club: ClubId, player: PlayerModel) {
        let cost = self.params.contract_price(player.level());
        let comment = format!(
            "New player contract with {} speciality {}.",
            player.initials(),
            player.speciality()
        );
        let club = &mut self.clubs[club];
        if club.account_mut().process_transaction(Transaction::new(-cost, comment)) {
            club.add_player(player);
        } else {
            tracing::warn!(club = %club.name(), cost, "Contract payment refused");
        }
    }

    /// Signs a player for the next season.
    pub fn sign_player(&mut self, club: ClubId, player: usize) -> GameResult<()> {
        self.check_player(club, player)?;
        let slot = &self.clubs[club].players()[player];
        if slot.has_next_contract {
            return Err(GameError::AlreadyContracted { player: slot.player.initials() });
        }
        if slot.player.age() + 1 >= RETIREMENT_AGE {
            return Err(GameError::TooOldForContract { player: slot.player.initials() });
        }
        let cost = self.params.contract_price(slot.player.level());
        let comment = format!("Renewed player contract with {}", slot.player.initials());
        self.check_funds(club, cost)?;

        let club = &mut self.clubs[club];
        if club.account_mut().process_transaction(Transaction::new(-cost, comment)) {
            club.contract_player(player);
        }
        Ok(())
    }

    /// Picks the player for the next match.
    pub fn select_player(&mut self, club: ClubId, player: usize) -> GameResult<()> {
        self.check_player(club, player)?;
        self.clubs[club].select_player(Some(player));
        Ok(())
    }

    pub fn select_coach_for_player(
        &mut self,
        club: ClubId,
        coach: usize,
        player: usize,
    ) -> GameResult<()> {
        self.check_player(club, player)?;
        if coach >= COACH_LEVELS.len() {
            return Err(GameError::UnknownCoach { index: coach, max: COACH_LEVELS.len() - 1 });
        }
        self.clubs[club].select_coach(coach, player);
        Ok(())
    }

    /// Moves the club to a court of the catalog. The ticket price resets.
    pub fn select_court(&mut self, club: ClubId, court: &str) -> GameResult<()> {
        self.club(club)?;
        let Some(spec) = self.params.courts.get(court) else {
            let choices = self.params.courts.keys().cloned().collect::<Vec<_>>().join("|");
            return Err(GameError::UnknownCourt { court: court.to_string(), choices });
        };
        let court = spec.build();
        self.clubs[club].set_court(court);
        Ok(())
    }

    pub fn set_ticket_price(&mut self, club: ClubId, price: i64) -> GameResult<()> {
        self.club(club)?;
        if price < 0 {
            return Err(GameError::NegativeTicketPrice { price });
        }
        self.clubs[club].set_ticket_price(price);
        Ok(())
    }
}
