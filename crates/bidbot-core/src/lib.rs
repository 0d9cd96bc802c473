// Auction bidding engine: team ledger, state encoding, heuristic scoring,
// tabular Q-learning, and the decision loop that combines them.

pub mod config;
pub mod engine;
pub mod ledger;
pub mod player;
pub mod policy;
pub mod scoring;
pub mod state;

pub use config::{AuctionConfig, EngineConfig, PolicyConfig, QuotaConfig, ValidationError};
pub use engine::{Acquisition, BidReason, Decision, DecisionEngine, EngineError, SkipReason, Transition};
pub use ledger::TeamLedger;
pub use player::{Nationality, PlayerRecord, PlayerRepository, Role};
pub use policy::{Action, ActionValues, ValuePolicy};
pub use state::StateKey;
