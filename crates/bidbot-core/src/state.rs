// Discrete state encoding of the team ledger for tabular lookup.

use serde::{Deserialize, Serialize};

use crate::config::QuotaConfig;
use crate::ledger::TeamLedger;
use crate::player::Role;

/// Bounded key into the value table.
///
/// Counts above the quota caps and fractional budget are not
/// distinguished, which keeps the state space finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub batsmen: u32,
    pub bowlers: u32,
    /// Keeper count capped at the keeper quota (a 0/1 flag for the default quota of 1).
    pub keeper: u32,
    pub foreign: u32,
    /// Remaining budget, floored to a whole crore.
    pub budget_bucket: i64,
}

/// Encode a ledger snapshot.
pub fn encode(ledger: &TeamLedger, quota: &QuotaConfig, foreign_limit: u32) -> StateKey {
    StateKey {
        batsmen: ledger.count(Role::Batsman).min(quota.batsmen),
        bowlers: ledger.count(Role::Bowler).min(quota.bowlers),
        keeper: ledger.count(Role::WicketKeeper).min(quota.wicket_keepers.max(1)),
        foreign: ledger.foreign_count().min(foreign_limit),
        budget_bucket: ledger.budget().floor() as i64,
    }
}
