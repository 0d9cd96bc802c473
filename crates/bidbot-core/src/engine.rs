// Decision engine: quota override, heuristic threshold, and learned action
// combined into a bid/skip call, plus the post-acquisition feedback loop.
//
// Each candidate goes through a two-phase cycle:
// 1. `should_bid` / `decide` evaluates the candidate and remembers the
//    transition (state, action, player, offered bid).
// 2. `apply` is called only if the decision was a bid and the player was
//    bought. It updates the ledger, rewards the remembered transition, and
//    decays exploration.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::ledger::TeamLedger;
use crate::player::{PlayerRecord, PlayerRepository, Role};
use crate::policy::{Action, ValuePolicy};
use crate::scoring;
use crate::state::{self, StateKey};

/// Reward per star of an acquired player.
pub const REWARD_PER_STAR: f64 = 10.0;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Caller contract violations for `apply`. None of them mutate the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("apply({name}) called without a pending decision")]
    NoPendingDecision { name: String },

    #[error("apply({actual}) called but the pending decision is for {expected}")]
    CandidateMismatch { expected: String, actual: String },

    #[error("apply({name}) called but the engine declined to bid")]
    DecisionDeclined { name: String },

    #[error("player {name} could not be resolved")]
    UnknownPlayer { name: String },

    #[error("invalid price {price}: must be a finite, non-negative amount")]
    InvalidPrice { price: f64 },
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BidReason {
    /// A required role is still under quota.
    Quota,
    /// The heuristic score cleared the threshold at an acceptable price.
    Rule,
    /// The learned policy chose to bid.
    Learned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    UnknownPlayer,
    OverBudget,
    /// Heuristic and learned policy both passed.
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Bid(BidReason),
    Skip(SkipReason),
}

impl Decision {
    pub fn is_bid(&self) -> bool {
        matches!(self, Decision::Bid(_))
    }
}

/// What the engine remembers between a decision and its `apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Name the decision was requested for.
    pub candidate: String,
    pub state: StateKey,
    pub action: Action,
    pub player: PlayerRecord,
    /// The bid evaluated at decision time.
    pub bid: f64,
    pub decision: Decision,
}

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Acquisition {
    pub player: PlayerRecord,
    /// Price actually paid.
    pub price: f64,
    /// Reward fed to the policy for this purchase.
    pub reward: f64,
}

// ---------------------------------------------------------------------------
// DecisionEngine
// ---------------------------------------------------------------------------

/// One auction session: ledger, value table, and exploration RNG.
pub struct DecisionEngine<R, G = ChaCha8Rng> {
    players: R,
    config: EngineConfig,
    ledger: TeamLedger,
    policy: ValuePolicy,
    rng: G,
    acquired: Vec<Acquisition>,
    pending: Option<Transition>,
}

impl<R: PlayerRepository> DecisionEngine<R, ChaCha8Rng> {
    /// Default quotas and learning parameters with the given purse and
    /// foreign limit. Exploration is seeded from OS entropy. The purse is not
    /// checked; a non-positive one skips every candidate.
    pub fn new(players: R, total_budget: f64, foreign_limit: u32) -> Self {
        Self::from_config(players, &EngineConfig::new(total_budget, foreign_limit))
    }

    /// Build from `config` as given. Callers validate it first with
    /// `EngineConfig::validate`. The RNG is seeded from `policy.seed` when
    /// set.
    pub fn from_config(players: R, config: &EngineConfig) -> Self {
        let rng = match config.policy.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(players, config, rng)
    }
}

impl<R: PlayerRepository, G: Rng> DecisionEngine<R, G> {
    pub fn with_rng(players: R, config: &EngineConfig, rng: G) -> Self {
        DecisionEngine {
            players,
            config: config.clone(),
            ledger: TeamLedger::new(config.auction.total_budget),
            policy: ValuePolicy::new(&config.policy),
            rng,
            acquired: Vec::new(),
            pending: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &TeamLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &ValuePolicy {
        &self.policy
    }

    /// Purchases so far, in order.
    pub fn acquired(&self) -> &[Acquisition] {
        &self.acquired
    }

    /// The transition awaiting `apply`, if any.
    pub fn pending(&self) -> Option<&Transition> {
        self.pending.as_ref()
    }

    /// Current state key of the ledger.
    pub fn state(&self) -> StateKey {
        state::encode(
            &self.ledger,
            &self.config.quota,
            self.config.auction.foreign_limit,
        )
    }

    /// Whether the ledger still needs players of `role` to meet its quota.
    pub fn quota_unmet(&self, role: Role) -> bool {
        let quota = &self.config.quota;
        let have = self.ledger.count(role);
        match role {
            Role::WicketKeeper => have < quota.wicket_keepers,
            Role::Batsman => have < quota.batsmen,
            Role::Bowler => have < quota.bowlers,
            Role::AllRounder => false,
        }
    }

    /// Whether to raise the bid on `name` to `next_bid`.
    pub fn should_bid(&mut self, name: &str, current_bid: f64, next_bid: f64) -> bool {
        self.decide(name, current_bid, next_bid).is_bid()
    }

    /// Full decision with its reason.
    ///
    /// Order of checks:
    /// 1. Unknown player or `next_bid` above the remaining purse: skip, nothing
    ///    recorded.
    /// 2. Role under quota: bid.
    /// 3. Otherwise bid if the heuristic accepts or the policy picks `Bid`.
    ///
    /// Any previously pending transition is discarded.
    pub fn decide(&mut self, name: &str, current_bid: f64, next_bid: f64) -> Decision {
        self.pending = None;

        let Some(player) = self.players.lookup(name) else {
            debug!("skip {}: not found in player tables", name);
            return Decision::Skip(SkipReason::UnknownPlayer);
        };

        if !self.ledger.can_afford(next_bid) {
            debug!(
                "skip {}: next bid {:.2} exceeds remaining budget {:.2}",
                name,
                next_bid,
                self.ledger.budget()
            );
            return Decision::Skip(SkipReason::OverBudget);
        }

        let state = self.state();

        if self.quota_unmet(player.role) {
            debug!(
                "bid {} at {:.2} (current {:.2}): {} quota unmet",
                name, next_bid, current_bid, player.role
            );
            let decision = Decision::Bid(BidReason::Quota);
            self.remember(name, state, Action::Bid, player, next_bid, decision);
            return decision;
        }

        let foreign_limit = self.config.auction.foreign_limit;
        let score = scoring::evaluate(&player, &self.ledger, foreign_limit);
        let rule_accepts = scoring::accepts(score, &player, next_bid);
        let action = self.policy.select_action(state, &mut self.rng);

        let decision = if rule_accepts {
            Decision::Bid(BidReason::Rule)
        } else if action == Action::Bid {
            Decision::Bid(BidReason::Learned)
        } else {
            Decision::Skip(SkipReason::Declined)
        };
        debug!(
            "{:?} {} at {:.2} (current {:.2}): score={:.3}, rule={}, action={}",
            decision, name, next_bid, current_bid, score, rule_accepts, action
        );

        self.remember(name, state, action, player, next_bid, decision);
        decision
    }

    fn remember(
        &mut self,
        name: &str,
        state: StateKey,
        action: Action,
        player: PlayerRecord,
        bid: f64,
        decision: Decision,
    ) {
        self.pending = Some(Transition {
            candidate: name.to_string(),
            state,
            action,
            player,
            bid,
            decision,
        });
    }

    /// Record the purchase of `name` at `price` and learn from it.
    ///
    /// Must follow a bidding decision for the same candidate with no other
    /// decision in between. The reward is `stars * 10 - bid`, where `bid` is
    /// the amount evaluated at decision time; the ledger is charged `price`.
    pub fn apply(&mut self, name: &str, price: f64) -> Result<Acquisition, EngineError> {
        self.check_pending(name)?;
        if !price.is_finite() || price < 0.0 {
            return Err(EngineError::InvalidPrice { price });
        }
        let player = self
            .players
            .lookup(name)
            .ok_or_else(|| EngineError::UnknownPlayer {
                name: name.to_string(),
            })?;
        let Some(transition) = self.pending.take() else {
            return Err(EngineError::NoPendingDecision {
                name: name.to_string(),
            });
        };

        self.ledger.record_acquisition(&player, price);
        if self.ledger.budget() < 0.0 {
            warn!(
                "budget overdrawn after buying {} at {:.2}: {:.2} remaining",
                name,
                price,
                self.ledger.budget()
            );
        }

        let new_state = self.state();
        let reward = player.stars as f64 * REWARD_PER_STAR - transition.bid;
        let value = self
            .policy
            .update(transition.state, transition.action, reward, new_state);
        self.policy.decay_epsilon();

        info!(
            "acquired {} ({}) for {:.2}: reward={:.2}, Q({})={:.3}, budget={:.2}, epsilon={:.3}",
            name,
            player.role,
            price,
            reward,
            transition.action,
            value,
            self.ledger.budget(),
            self.policy.epsilon()
        );

        let acquisition = Acquisition {
            player,
            price,
            reward,
        };
        self.acquired.push(acquisition.clone());
        Ok(acquisition)
    }

    fn check_pending(&self, name: &str) -> Result<(), EngineError> {
        match &self.pending {
            None => Err(EngineError::NoPendingDecision {
                name: name.to_string(),
            }),
            Some(t) if t.candidate != name => Err(EngineError::CandidateMismatch {
                expected: t.candidate.clone(),
                actual: name.to_string(),
            }),
            Some(t) if !t.decision.is_bid() => Err(EngineError::DecisionDeclined {
                name: name.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }
}
