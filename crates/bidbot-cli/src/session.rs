// Driver loop: feed candidates to the engine and collect the outcomes.

use std::collections::BTreeMap;

use bidbot_core::{
    Acquisition, Decision, DecisionEngine, EngineError, PlayerRepository, Role,
};
use rand::Rng;
use serde::Serialize;
use tracing::info;

/// Lower bound of the simulated current bid, in crores.
pub const MIN_CURRENT_BID: f64 = 0.5;
/// Cap on the simulated current and next bid.
pub const MAX_BID: f64 = 2.0;
/// Raise applied to the current bid.
pub const BID_INCREMENT: f64 = 0.1;

/// The result of offering one candidate to the engine.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub name: String,
    pub current_bid: f64,
    pub next_bid: f64,
    pub decision: Decision,
    pub acquisition: Option<Acquisition>,
}

impl Outcome {
    /// One line of auction output.
    pub fn describe(&self) -> String {
        match &self.acquisition {
            Some(a) => format!("bids on {} at {:.2} Cr", self.name, a.price),
            None => format!("skips {}", self.name),
        }
    }
}

/// Draw the next (current, next) bid pair: current uniform in [0.5, 2.0),
/// next one increment higher but never above 2.0.
pub fn simulated_bids<B: Rng>(bids: &mut B) -> (f64, f64) {
    let current = bids.gen_range(MIN_CURRENT_BID..MAX_BID);
    let next = (current + BID_INCREMENT).min(MAX_BID);
    (current, next)
}

/// Offer each candidate in turn at a simulated price, buying at the next bid
/// whenever the engine says to.
pub fn run_auction<R, G, B>(
    engine: &mut DecisionEngine<R, G>,
    candidates: &[String],
    bids: &mut B,
) -> Result<Vec<Outcome>, EngineError>
where
    R: PlayerRepository,
    G: Rng,
    B: Rng,
{
    let mut outcomes = Vec::with_capacity(candidates.len());
    for name in candidates {
        let (current_bid, next_bid) = simulated_bids(bids);
        let decision = engine.decide(name, current_bid, next_bid);
        let acquisition = if decision.is_bid() {
            Some(engine.apply(name, next_bid)?)
        } else {
            None
        };
        outcomes.push(Outcome {
            name: name.clone(),
            current_bid,
            next_bid,
            decision,
            acquisition,
        });
    }
    info!(
        "session finished: {} of {} candidates bought, {:.2} remaining",
        engine.acquired().len(),
        candidates.len(),
        engine.ledger().budget()
    );
    Ok(outcomes)
}

/// Machine-readable summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub outcomes: Vec<Outcome>,
    pub acquired: Vec<Acquisition>,
    pub remaining_budget: f64,
    pub role_counts: BTreeMap<String, u32>,
    pub foreign_count: u32,
    pub final_epsilon: f64,
    pub states_visited: usize,
}

impl SessionReport {
    pub fn new<R: PlayerRepository, G: Rng>(
        engine: &DecisionEngine<R, G>,
        outcomes: Vec<Outcome>,
    ) -> Self {
        let ledger = engine.ledger();
        SessionReport {
            outcomes,
            acquired: engine.acquired().to_vec(),
            remaining_budget: ledger.budget(),
            role_counts: Role::ALL
                .iter()
                .map(|&r| (r.label().to_string(), ledger.count(r)))
                .collect(),
            foreign_count: ledger.foreign_count(),
            final_epsilon: engine.policy().epsilon(),
            states_visited: engine.policy().len(),
        }
    }

    /// Names of the acquired players, comma separated.
    pub fn team_line(&self) -> String {
        self.acquired
            .iter()
            .map(|a| a.player.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
