// Team ledger: remaining purse and squad composition.

use serde::{Deserialize, Serialize};

use crate::player::{PlayerRecord, Role};

/// Budget and per-role counts for the team being assembled.
///
/// Owned by a single `DecisionEngine`; the only mutation path is an
/// acquisition, so the purse never grows and counts never shrink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLedger {
    budget: f64,
    batsmen: u32,
    bowlers: u32,
    wicket_keepers: u32,
    all_rounders: u32,
    foreign: u32,
}

impl TeamLedger {
    pub fn new(total_budget: f64) -> Self {
        TeamLedger {
            budget: total_budget,
            batsmen: 0,
            bowlers: 0,
            wicket_keepers: 0,
            all_rounders: 0,
            foreign: 0,
        }
    }

    /// Remaining purse in crores.
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Number of acquired players in the given role.
    pub fn count(&self, role: Role) -> u32 {
        match role {
            Role::Batsman => self.batsmen,
            Role::Bowler => self.bowlers,
            Role::WicketKeeper => self.wicket_keepers,
            Role::AllRounder => self.all_rounders,
        }
    }

    pub fn foreign_count(&self) -> u32 {
        self.foreign
    }

    /// Total number of acquired players.
    pub fn squad_size(&self) -> u32 {
        Role::ALL.iter().map(|&r| self.count(r)).sum()
    }

    /// Whether a bid of `amount` fits in the remaining purse.
    pub fn can_afford(&self, amount: f64) -> bool {
        amount <= self.budget
    }

    /// Deduct `price` and count the player in its role (and as foreign when
    /// applicable).
    pub(crate) fn record_acquisition(&mut self, player: &PlayerRecord, price: f64) {
        self.budget -= price;
        let slot = match player.role {
            Role::Batsman => &mut self.batsmen,
            Role::Bowler => &mut self.bowlers,
            Role::WicketKeeper => &mut self.wicket_keepers,
            Role::AllRounder => &mut self.all_rounders,
        };
        *slot += 1;
        if player.is_foreign() {
            self.foreign += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Nationality;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = TeamLedger::new(40.0);
        assert_eq!(ledger.budget(), 40.0);
        for role in Role::ALL {
            assert_eq!(ledger.count(role), 0);
        }
        assert_eq!(ledger.foreign_count(), 0);
        assert_eq!(ledger.squad_size(), 0);
    }

    #[test]
    fn acquisition_updates_budget_and_counts() {
        let mut ledger = TeamLedger::new(40.0);
        let mut keeper = PlayerRecord::new("Keeper", Role::WicketKeeper);
        keeper.nationality = Nationality::Foreign;

        ledger.record_acquisition(&keeper, 2.5);

        assert!((ledger.budget() - 37.5).abs() < 1e-9);
        assert_eq!(ledger.count(Role::WicketKeeper), 1);
        assert_eq!(ledger.count(Role::Batsman), 0);
        assert_eq!(ledger.foreign_count(), 1);
        assert_eq!(ledger.squad_size(), 1);
    }

    #[test]
    fn domestic_acquisition_leaves_foreign_count() {
        let mut ledger = TeamLedger::new(10.0);
        ledger.record_acquisition(&PlayerRecord::new("A", Role::AllRounder), 1.0);
        ledger.record_acquisition(&PlayerRecord::new("B", Role::AllRounder), 1.0);
        assert_eq!(ledger.count(Role::AllRounder), 2);
        assert_eq!(ledger.foreign_count(), 0);
        assert!((ledger.budget() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn can_afford_is_inclusive() {
        let ledger = TeamLedger::new(2.0);
        assert!(ledger.can_afford(2.0));
        assert!(ledger.can_afford(1.9));
        assert!(!ledger.can_afford(2.01));
    }
}
