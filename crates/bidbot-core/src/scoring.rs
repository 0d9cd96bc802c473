// Heuristic desirability score for an auction candidate.
//
// score = (stars + 1) / base_price * role_weight * batting_boost * bowling_boost
//
// Batting boost applies to batsmen and all-rounders, bowling boost to bowlers
// and all-rounders. A foreign candidate scores zero once the foreign limit is
// reached.

use crate::ledger::TeamLedger;
use crate::player::{PlayerRecord, Role};

/// Score above which the heuristic recommends a bid.
pub const SCORE_THRESHOLD: f64 = 1.0;

/// The heuristic only accepts bids up to this multiple of the base price.
pub const MAX_PRICE_MULTIPLE: f64 = 1.5;

/// Per-role multiplier applied to the base value.
pub fn role_weight(role: Role) -> f64 {
    match role {
        Role::Batsman => 1.2,
        Role::Bowler => 1.2,
        Role::WicketKeeper => 1.5,
        Role::AllRounder => 1.1,
    }
}

/// `(average / 30) * (strike_rate / 100)`; 1.0 for an average batter.
pub fn batting_boost(player: &PlayerRecord) -> f64 {
    (player.batting_avg / 30.0) * (player.strike_rate / 100.0)
}

/// `((wickets + 1) / 25) * (7 / (economy + 1))`.
pub fn bowling_boost(player: &PlayerRecord) -> f64 {
    ((player.wickets as f64 + 1.0) / 25.0) * (7.0 / (player.economy + 1.0))
}

/// Deterministic score for `player` given the current ledger.
pub fn evaluate(player: &PlayerRecord, ledger: &TeamLedger, foreign_limit: u32) -> f64 {
    if player.is_foreign() && ledger.foreign_count() >= foreign_limit {
        return 0.0;
    }

    let mut value = (player.stars as f64 + 1.0) / player.base_price;
    value *= role_weight(player.role);
    if player.role.bats() {
        value *= batting_boost(player);
    }
    if player.role.bowls() {
        value *= bowling_boost(player);
    }
    value.max(0.0)
}

/// Heuristic accept: a good enough score at no more than 1.5x base price.
pub fn accepts(score: f64, player: &PlayerRecord, next_bid: f64) -> bool {
    score > SCORE_THRESHOLD && next_bid <= player.base_price * MAX_PRICE_MULTIPLE
}
