//! Daily stamina recovery.

use serde::{Deserialize, Serialize};

use super::types::PlayerModel;

/// Restores a share of max stamina that shrinks linearly with exhaustion.
///
/// `recovered = max_stamina * (100 - min(exhaustion * factor, 100)) / 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhaustedLinearRecovery {
    pub factor: i64,
}

impl ExhaustedLinearRecovery {
    pub fn new(factor: i64) -> Self {
        Self { factor }
    }

    pub fn amount(&self, player: &PlayerModel) -> i64 {
        let penalty = (player.exhaustion() * self.factor).clamp(0, 100);
        let recovered = player.max_stamina() as f64 * (100 - penalty) as f64 / 100.0;
        recovered.round() as i64
    }

    pub fn apply(&self, player: &mut PlayerModel) {
        let amount = self.amount(player);
        player.recover_stamina(amount);
    }
}
