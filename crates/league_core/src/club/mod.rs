//! Club bookkeeping: roster, court, ledger and fame.
//!
//! A club makes no decisions of its own; the AI and the manager act on it
//! through [`Game`](crate::game::Game).

pub mod court;
pub mod fame;
pub mod financial;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::constants::{COACH_LEVELS, RETIREMENT_AGE};
use crate::player::{PlayerModel, Surface};

pub use court::{AttendanceCalculator, AttendanceFactors, Court};
pub use fame::FameTracker;
pub use financial::{FinancialAccount, Transaction};

/// Club index in the game's club arena.
pub type ClubId = usize;

/// A rostered player with the coach assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub player: PlayerModel,
    pub coach_level: u8,
    pub has_next_contract: bool,
}

impl PlayerSlot {
    pub fn new(player: PlayerModel, coach_level: u8) -> Self {
        Self { player, coach_level, has_next_contract: false }
    }

    /// Whether the player is young enough to be signed for next season.
    pub fn is_signable(&self) -> bool {
        self.player.age() + 1 < RETIREMENT_AGE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    name: String,
    surface: Surface,
    coach_power: u8,
    court: Court,
    players: Vec<PlayerSlot>,
    account: FinancialAccount,
    fame_tracker: FameTracker,
    is_controlled: bool,
    selected_player: Option<usize>,
}

impl Club {
    pub fn new(name: impl Into<String>, surface: Surface, coach_power: u8, court: Court) -> Self {
        Self {
            name: name.into(),
            surface,
            coach_power,
            court,
            players: Vec::new(),
            account: FinancialAccount::new(),
            fame_tracker: FameTracker::default(),
            is_controlled: false,
            selected_player: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Surface of the club's home matches.
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Coach level given to newly hired players.
    pub fn coach_power(&self) -> u8 {
        self.coach_power
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn set_court(&mut self, court: Court) {
        self.court = court;
    }

    pub fn set_ticket_price(&mut self, price: i64) {
        self.court.set_ticket_price(price);
    }

    pub fn account(&self) -> &FinancialAccount {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut FinancialAccount {
        &mut self.account
    }

    pub fn balance(&self) -> i64 {
        self.account.balance()
    }

    pub fn fame(&self) -> i64 {
        self.fame_tracker.fame()
    }

    pub fn fame_tracker(&self) -> &FameTracker {
        &self.fame_tracker
    }

    pub fn add_fame(&mut self, value: i64) {
        self.fame_tracker.add(value);
    }

    pub fn is_controlled(&self) -> bool {
        self.is_controlled
    }

    pub fn set_controlled(&mut self, value: bool) {
        self.is_controlled = value;
    }

    /// A human-controlled club must pick its player before a match.
    pub fn needs_decision(&self) -> bool {
        self.is_controlled && self.selected_player.is_none()
    }

    // =========================================================================
    // Roster
    // =========================================================================

    pub fn players(&self) -> &[PlayerSlot] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&PlayerSlot> {
        self.players.get(index)
    }

    pub fn add_player(&mut self, player: PlayerModel) {
        let slot = PlayerSlot::new(player, self.coach_power);
        self.players.push(slot);
    }

    pub fn add_slot(&mut self, slot: PlayerSlot) {
        self.players.push(slot);
    }

    /// Removes a player from the roster, keeping the selection pointing at
    /// the same player.
    pub fn pop_player(&mut self, index: usize) -> PlayerModel {
        self.selected_player = match self.selected_player {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        self.players.remove(index).player
    }

    pub fn contract_player(&mut self, index: usize) {
        if let Some(slot) = self.players.get_mut(index) {
            slot.has_next_contract = true;
        }
    }

    pub fn clear_contracts(&mut self) {
        for slot in &mut self.players {
            slot.has_next_contract = false;
        }
    }

    /// Players the manager still has to sign or fire before the season ends.
    pub fn has_unresolved_contracts(&self) -> bool {
        self.players.iter().any(|slot| slot.is_signable() && !slot.has_next_contract)
    }

    pub fn expel_retired_players(&mut self) -> Vec<PlayerModel> {
        let (active, retired): (Vec<_>, Vec<_>) =
            self.players.drain(..).partition(|slot| slot.player.age() < RETIREMENT_AGE);
        self.players = active;
        self.selected_player = None;
        retired.into_iter().map(|slot| slot.player).collect()
    }

    pub fn select_coach(&mut self, coach_index: usize, player_index: usize) {
        if let (Some(&level), Some(slot)) =
            (COACH_LEVELS.get(coach_index), self.players.get_mut(player_index))
        {
            slot.coach_level = level;
        }
    }

    /// Ages every player and fully restores them for a new season.
    pub fn rest_after_season(&mut self) {
        for slot in &mut self.players {
            slot.player.age_up();
            slot.player.after_season_rest();
        }
    }

    /// One practice day: each player earns `current_stamina * coach_level`
    /// experience.
    pub fn perform_practice<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for slot in &mut self.players {
            let experience = slot.player.current_stamina().max(0) * i64::from(slot.coach_level);
            slot.player.add_experience(experience, rng);
        }
    }

    pub fn for_each_player_mut(&mut self, mut f: impl FnMut(&mut PlayerModel)) {
        for slot in &mut self.players {
            f(&mut slot.player);
        }
    }

    // =========================================================================
    // Match selection
    // =========================================================================

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_player
    }

    pub fn select_player(&mut self, index: Option<usize>) {
        self.selected_player = index.filter(|&i| i < self.players.len());
    }

    /// Index of the player with the highest selection score; the first one
    /// wins ties.
    pub fn best_player_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, slot) in self.players.iter().enumerate() {
            let score = slot.player.selection_score();
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// The manager's pick, or the best available player.
    pub fn match_player_index(&self) -> Option<usize> {
        self.selected_player.or_else(|| self.best_player_index())
    }

    pub fn match_player(&self) -> Option<&PlayerModel> {
        self.match_player_index().and_then(|i| self.players.get(i)).map(|s| &s.player)
    }

    pub fn match_player_mut(&mut self) -> Option<&mut PlayerModel> {
        let index = self.match_player_index()?;
        self.players.get_mut(index).map(|s| &mut s.player)
    }
}

/// Mutable access to two different clubs of the arena.
///
/// # Panics
///
/// When `a == b`: a club never plays itself.
pub fn two_clubs_mut(clubs: &mut [Club], a: ClubId, b: ClubId) -> (&mut Club, &mut Club) {
    assert_ne!(a, b, "Club #{} can't play against itself", a);
    if a < b {
        let (left, right) = clubs.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = clubs.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(technique: i64, age: u32) -> PlayerModel {
        PlayerModel::new("A", "B", "C", technique, 50, age, Surface::Clay)
    }

    fn club_with(players: &[(i64, u32)]) -> Club {
        let mut club = Club::new("Sydney Storm", Surface::Grass, 1, Court::new(1000, 1000));
        for &(technique, age) in players {
            club.add_player(player(technique, age));
        }
        club
    }

    #[test]
    fn test_new_players_get_club_coach() {
        let club = club_with(&[(50, 16)]);
        assert_eq!(club.players()[0].coach_level, 1);
        assert!(!club.players()[0].has_next_contract);
    }

    #[test]
    fn test_best_player_selection() {
        let mut club = club_with(&[(40, 16), (70, 16), (70, 17)]);
        assert_eq!(club.best_player_index(), Some(1));
        assert_eq!(club.match_player_index(), Some(1));

        club.select_player(Some(0));
        assert_eq!(club.match_player_index(), Some(0));
        assert!(!club.needs_decision());

        club.select_player(None);
        club.set_controlled(true);
        assert!(club.needs_decision());
    }

    #[test]
    fn test_pop_player_keeps_selection() {
        let mut club = club_with(&[(40, 16), (50, 16), (60, 16)]);
        club.select_player(Some(2));
        club.pop_player(0);
        assert_eq!(club.selected_index(), Some(1));
        assert_eq!(club.players()[1].player.raw_technique(), 60);

        club.pop_player(1);
        assert_eq!(club.selected_index(), None);
    }

    #[test]
    fn test_expel_retired_players() {
        let mut club = club_with(&[(40, 16), (50, 21), (60, 22)]);
        let retired = club.expel_retired_players();
        assert_eq!(retired.len(), 2);
        assert_eq!(club.players().len(), 1);
    }

    #[test]
    fn test_unresolved_contracts_ignore_retiring_players() {
        let mut club = club_with(&[(40, 20), (50, 18)]);
        assert!(!club.players()[0].is_signable());
        assert!(club.has_unresolved_contracts());

        club.contract_player(1);
        assert!(!club.has_unresolved_contracts());
    }

    #[test]
    fn test_practice_uses_stamina_and_coach() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut club = club_with(&[(40, 16)]);
        club.select_coach(2, 0);
        club.perform_practice(&mut rng);
        assert_eq!(club.players()[0].player.experience(), 100);

        club.select_coach(0, 0);
        club.perform_practice(&mut rng);
        assert_eq!(club.players()[0].player.experience(), 100);
    }

    #[test]
    fn test_two_clubs_mut() {
        let mut clubs = vec![club_with(&[]), club_with(&[]), club_with(&[])];
        let (a, b) = two_clubs_mut(&mut clubs, 2, 0);
        a.set_controlled(true);
        b.add_fame(10);
        assert!(clubs[2].is_controlled());
        assert_eq!(clubs[0].fame(), 10);
    }
}
