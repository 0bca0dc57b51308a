//! # Game
//!
//! Top-level orchestrator of a league session. The game owns every club, the
//! live competition, the free-agent pool and the season history; all
//! mutation goes through its public operations (see `actions.rs`) and
//! [`Game::update`], which advances one day.
//!
//! ## Day loop
//!
//! 1. Controlled clubs that can no longer play are handed to the AI.
//! 2. The day is refused while a decision is pending or a controlled club
//!    can't pay for rent or practice.
//! 3. Practice (championship rest days only), matches, gate money,
//!    recovery, AI roster backfill.
//! 4. Selections are cleared.
//! 5. Season and competition boundaries are handled.

mod actions;
mod context;

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::club::{AttendanceCalculator, AttendanceFactors, Club, ClubId, Transaction};
use crate::competition::{Competition, Playoff, RegularChampionship, Standings};
use crate::config::constants::{
    AI_HIRE_TECHNIQUE_THRESHOLD, CHAMPIONSHIP_TITLE, RETIREMENT_AGE, STARTING_AGE,
};
use crate::config::GameParams;
use crate::data::{default_club_seeds, ClubSeed};
use crate::engine::MatchResult;
use crate::error::{GameError, GameResult};
use crate::player::{ExhaustedLinearRecovery, PlayerFactory, PlayerModel, Surface};

pub use context::{DayResultRow, FreeAgentInfo, GameContext, OpponentInfo, PlayerInfo};

/// Final standings of one season, by competition title.
pub type SeasonHistory = BTreeMap<String, Standings>;

/// Transactions shown in the context.
const LATEST_TRANSACTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    game_id: String,
    manager_club_id: ClubId,
    params: GameParams,
    clubs: Vec<Club>,
    competition: Competition,
    free_agents: Vec<PlayerModel>,
    history: Vec<SeasonHistory>,
    season_fame: Vec<i64>,
    last_results: Vec<MatchResult>,
    rng: ChaCha8Rng,
}

impl Game {
    /// Creates a game on the embedded roster.
    pub fn new(
        params: GameParams,
        game_id: impl Into<String>,
        manager_club_id: ClubId,
        seed: u64,
    ) -> GameResult<Self> {
        Self::with_clubs(params, &default_club_seeds(), game_id, manager_club_id, seed)
    }

    /// Creates a game, fast-forwards `years_to_simulate` seasons without a
    /// manager and then hands the manager their club.
    pub fn with_clubs(
        params: GameParams,
        seeds: &[ClubSeed],
        game_id: impl Into<String>,
        manager_club_id: ClubId,
        seed: u64,
    ) -> GameResult<Self> {
        params
            .validate()
            .map_err(|error| GameError::InvalidParams { reason: error.to_string() })?;
        if seeds.len() < 2 {
            return Err(GameError::NotEnoughClubs { count: seeds.len() });
        }
        if manager_club_id >= seeds.len() {
            return Err(GameError::UnknownClub { club: manager_club_id });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let court = params.default_court();
        let clubs: Vec<Club> = seeds.iter().map(|seed| seed.build(court.build())).collect();
        let competition = Competition::Championship(RegularChampionship::new(
            clubs.len(),
            params.championship.clone(),
            params.match_rules.clone(),
            &mut rng,
        ));

        let mut game = Self {
            game_id: game_id.into(),
            manager_club_id,
            season_fame: vec![0; clubs.len()],
            params,
            clubs,
            competition,
            free_agents: Vec::new(),
            history: vec![SeasonHistory::new()],
            last_results: Vec::new(),
            rng,
        };

        let years = game.params.years_to_simulate;
        game.simulate(years)?;
        game.generate_free_agents();
        game.clubs[manager_club_id].set_controlled(true);

        tracing::info!(
            game_id = %game.game_id,
            manager = %game.clubs[manager_club_id].name(),
            clubs = game.clubs.len(),
            "Game created"
        );
        Ok(game)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn manager_club_id(&self) -> ClubId {
        self.manager_club_id
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn club(&self, club: ClubId) -> GameResult<&Club> {
        self.clubs.get(club).ok_or(GameError::UnknownClub { club })
    }

    pub fn competition(&self) -> &Competition {
        &self.competition
    }

    pub fn day(&self) -> usize {
        self.competition.day()
    }

    /// 1-based season number.
    pub fn season(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[SeasonHistory] {
        &self.history
    }

    pub fn free_agents(&self) -> &[PlayerModel] {
        &self.free_agents
    }

    /// Results of the last played day, with gate money filled in.
    pub fn last_results(&self) -> &[MatchResult] {
        &self.last_results
    }

    /// The league never ends.
    pub fn is_over(&self) -> bool {
        false
    }

    /// The cup has concluded.
    pub fn is_season_over(&self) -> bool {
        self.competition.is_playoff() && self.competition.is_over()
    }

    // =========================================================================
    // Day loop
    // =========================================================================

    /// Plays one day.
    ///
    /// Refusals leave the game untouched, apart from the auto-demotion of
    /// controlled clubs that can't play any more.
    pub fn update(&mut self) -> GameResult<()> {
        self.demote_invalid_clubs();
        self.check_day_preconditions()?;

        self.perform_practice();
        self.play_one_day();
        self.unselect_players();

        if self.is_season_over() {
            self.update_season_fame();
            self.next_season();
        }

        if self.competition.is_over() {
            self.update_season_fame();
            self.save_history();
            self.start_playoff();
        }
        Ok(())
    }

    /// Updates until the next competition starts.
    ///
    /// Always plays at least one day. Returns the number of days played; a
    /// refused day stops the run with its error.
    pub fn proceed_to_next_competition(&mut self) -> GameResult<usize> {
        let mut days = 0;
        loop {
            self.update()?;
            days += 1;
            if self.competition.day() == 0 {
                return Ok(days);
            }
        }
    }

    fn simulate(&mut self, years: usize) -> GameResult<()> {
        while self.history.len() < years {
            self.update()?;
        }
        Ok(())
    }

    fn check_day_preconditions(&self) -> GameResult<()> {
        let matches = self.competition.current_matches();

        for scheduled in &matches {
            if self.clubs[scheduled.home].needs_decision()
                || self.clubs[scheduled.away].needs_decision()
            {
                return Err(GameError::DecisionRequired);
            }
        }

        for scheduled in &matches {
            let host = &self.clubs[scheduled.home];
            if host.is_controlled() && host.court().rent_cost() > host.balance() {
                return Err(GameError::CourtRentUnaffordable);
            }
        }

        if self.can_practice() {
            let unaffordable = self
                .clubs
                .iter()
                .filter(|club| club.is_controlled())
                .any(|club| self.practice_cost(club) > club.balance());
            if unaffordable {
                return Err(GameError::PracticeUnaffordable);
            }
        }

        if self.competition.ends_season_with_next_update() && !self.contracts_resolved() {
            return Err(GameError::UnresolvedContracts);
        }
        Ok(())
    }

    /// Every controlled club decided on all its signable players.
    fn contracts_resolved(&self) -> bool {
        self.clubs
            .iter()
            .filter(|club| club.is_controlled())
            .all(|club| !club.has_unresolved_contracts())
    }

    fn can_practice(&self) -> bool {
        !self.competition.is_playoff() && !self.competition.has_matches_today()
    }

    /// Daily practice bill of a club.
    pub fn practice_cost(&self, club: &Club) -> i64 {
        club.players()
            .iter()
            .map(|slot| self.params.practice_price(slot.player.level(), slot.coach_level))
            .sum()
    }

    fn perform_practice(&mut self) {
        if !self.can_practice() {
            return;
        }
        let day = self.competition.day();
        for index in 0..self.clubs.len() {
            if self.clubs[index].is_controlled() {
                let cost = self.practice_cost(&self.clubs[index]);
                let charge = Transaction::new(-cost, format!("Practice on day {}", day));
                if !self.clubs[index].account_mut().process_transaction(charge) {
                    tracing::warn!(club = %self.clubs[index].name(), cost, "Practice charge refused");
                }
            }
            self.clubs[index].perform_practice(&mut self.rng);
        }
    }

    fn play_one_day(&mut self) {
        let importance = self.competition.match_importance();
        let mut results = self
            .competition
            .update(&mut self.clubs, &mut self.rng)
            .unwrap_or_default();
        for result in &mut results {
            self.collect_match_income(result, importance);
        }
        self.recover();
        self.hire_players_if_needed();
        self.last_results = results;
    }

    /// Gate money and court rent of the home club.
    fn collect_match_income(&mut self, result: &mut MatchResult, importance: i64) {
        let calculator =
            AttendanceCalculator::new(self.params.attendance.clone(), self.params.is_hard);
        let away_fame = self.clubs[result.away_id].fame();
        let title = self.competition.title();
        let day = self.competition.day();
        let host = &mut self.clubs[result.home_id];

        let factors = AttendanceFactors {
            ticket_price: host.court().ticket_price(),
            home_fame: host.fame(),
            away_fame,
            reputation: result.home_player.as_ref().map_or(0, PlayerModel::reputation),
            match_importance: importance,
        };
        let attendance = calculator.attendance(&factors);
        let court = *host.court();
        result.income = court.match_income(attendance);
        result.attendance = court.admitted(attendance);

        let income = Transaction::new(
            result.income,
            format!(
                "{}, {}, attendance: {}, ticket price: {}.",
                title,
                day,
                result.attendance,
                court.ticket_price()
            ),
        );
        if !host.account_mut().process_transaction(income) {
            tracing::warn!(club = %host.name(), income = result.income, "Gate money refused");
        }
        let rent = Transaction::new(-court.rent_cost(), "Court rent cost.");
        if !host.account_mut().process_transaction(rent) {
            tracing::warn!(club = %host.name(), rent = court.rent_cost(), "Court rent refused");
        }
    }

    fn recover(&mut self) {
        let recovery = ExhaustedLinearRecovery::new(self.params.exhaustion_factor);
        for club in &mut self.clubs {
            club.for_each_player_mut(|player| recovery.apply(player));
        }
    }

    /// AI clubs with nobody fit to play hire a rookie.
    fn hire_players_if_needed(&mut self) {
        let factory = PlayerFactory::default();
        for club in self.clubs.iter_mut().filter(|club| !club.is_controlled()) {
            let exhausted = club
                .players()
                .iter()
                .all(|slot| slot.player.actual_technique() < AI_HIRE_TECHNIQUE_THRESHOLD);
            if exhausted {
                let rookie =
                    factory.create_player(&mut self.rng, 0, STARTING_AGE, Some(club.surface()));
                tracing::debug!(club = %club.name(), rookie = %rookie.initials(), "AI hired a rookie");
                club.add_player(rookie);
            }
        }
    }

    fn unselect_players(&mut self) {
        for club in &mut self.clubs {
            club.select_player(None);
        }
    }

    // =========================================================================
    // Season boundaries
    // =========================================================================

    fn update_season_fame(&mut self) {
        for (club, fame) in self.season_fame.iter_mut().enumerate() {
            *fame += self.competition.club_fame(club);
        }
    }

    fn save_history(&mut self) {
        let standings = self.competition.standings();
        let title = self.competition.title().to_string();
        if let Some(season) = self.history.last_mut() {
            season.insert(title, standings);
        }
    }

    fn start_playoff(&mut self) {
        let seeding = self
            .competition
            .standings()
            .table()
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        self.competition = Competition::Playoff(Playoff::new(
            self.params.playoff.clone(),
            self.params.match_rules.clone(),
            seeding,
            &mut self.rng,
        ));
        tracing::info!(season = self.season(), "Regular season over, cup started");
    }

    /// Clubs in the order of the last regular season table.
    fn championship_order(&self) -> Vec<ClubId> {
        self.history
            .last()
            .and_then(|season| season.get(CHAMPIONSHIP_TITLE))
            .and_then(Standings::table)
            .map(|rows| rows.iter().map(|row| row.club_id).collect())
            .unwrap_or_else(|| (0..self.clubs.len()).collect())
    }

    fn next_season(&mut self) {
        let season = self.season();
        let factory = PlayerFactory::default();

        for club_id in self.championship_order() {
            let club = &mut self.clubs[club_id];
            club.rest_after_season();
            club.clear_contracts();
            club.add_fame(self.season_fame[club_id]);
            self.season_fame[club_id] = 0;

            let retired = club.expel_retired_players();
            if !retired.is_empty() {
                tracing::debug!(club = %club.name(), retired = retired.len(), "Players retired");
            }
            club.account_mut()
                .merge_transactions(format!("Balance carried over from season {}", season));

            if club.is_controlled() {
                continue;
            }
            let level = self.rng.gen_range(0..=5);
            let rookie = factory.create_player(&mut self.rng, level, STARTING_AGE, Some(club.surface()));
            club.add_player(rookie);
        }

        self.generate_free_agents();
        self.save_history();
        self.competition = Competition::Championship(RegularChampionship::new(
            self.clubs.len(),
            self.params.championship.clone(),
            self.params.match_rules.clone(),
            &mut self.rng,
        ));
        self.history.push(SeasonHistory::new());
        tracing::info!(season = self.season(), "New season started");
    }

    /// Replaces the pool with 3 to 10 random players.
    fn generate_free_agents(&mut self) {
        let factory = PlayerFactory::default();
        let count = self.rng.gen_range(3..=10);
        let mut agents: Vec<PlayerModel> = (0..count)
            .map(|_| {
                let age = self.rng.gen_range(STARTING_AGE..RETIREMENT_AGE);
                let level = self.rng.gen_range(1..=10);
                let speciality = Surface::random(&mut self.rng);
                factory.create_player(&mut self.rng, level, age, Some(speciality))
            })
            .collect();
        agents.sort_by(|a, b| (b.speciality(), b.level()).cmp(&(a.speciality(), a.level())));
        self.free_agents = agents;
    }

    // =========================================================================
    // Control
    // =========================================================================

    pub fn set_controlled(&mut self, club: ClubId, is_controlled: bool) -> GameResult<()> {
        self.club(club)?;
        self.clubs[club].set_controlled(is_controlled);
        Ok(())
    }

    /// Hands controlled clubs that can't play today to the AI.
    fn demote_invalid_clubs(&mut self) {
        for club in 0..self.clubs.len() {
            if !self.is_club_valid(club) {
                tracing::warn!(club = %self.clubs[club].name(), "Club can't play on, handed to the AI");
                self.clubs[club].set_controlled(false);
            }
        }
    }

    fn is_club_valid(&self, club_id: ClubId) -> bool {
        let club = &self.clubs[club_id];
        if !club.is_controlled() {
            return true;
        }
        let Some(opponent) = self.opponent(club_id) else {
            return true;
        };

        let best = club
            .players()
            .iter()
            .map(|slot| slot.player.actual_technique())
            .fold(0.0, f64::max);
        if best <= 0.0 && club.balance() < self.params.contract_price(0) {
            return false;
        }

        if opponent.player.is_none() {
            return true;
        }
        club.balance() >= self.params.default_court().rent_cost
    }

    /// Opponent of today's match. The opponent's player and fame are only
    /// known when playing at home.
    pub fn opponent(&self, club_id: ClubId) -> Option<OpponentInfo> {
        if self.competition.is_over() {
            return None;
        }
        let scheduled = self.competition.match_of(club_id)?;
        if scheduled.home == club_id {
            let opponent = &self.clubs[scheduled.away];
            Some(OpponentInfo {
                club_name: opponent.name().to_string(),
                match_surface: self.clubs[club_id].surface(),
                player: opponent.match_player().cloned(),
                fame: Some(opponent.fame()),
            })
        } else {
            let host = &self.clubs[scheduled.home];
            Some(OpponentInfo {
                club_name: host.name().to_string(),
                match_surface: host.surface(),
                player: None,
                fame: None,
            })
        }
    }
}
