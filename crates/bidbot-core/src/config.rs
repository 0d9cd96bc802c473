// Engine parameters: auction limits, role quotas, and learning rates.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error for field `{field}`: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Budget and squad-composition limits for one auction session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Total purse in crores.
    pub total_budget: f64,
    /// Maximum foreign acquisitions.
    pub foreign_limit: u32,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        AuctionConfig {
            total_budget: 40.0,
            foreign_limit: 4,
        }
    }
}

/// Minimum role counts. While unmet, a candidate of that role is bid on
/// regardless of score or learned action.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub batsmen: u32,
    pub bowlers: u32,
    pub wicket_keepers: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        QuotaConfig {
            batsmen: 3,
            bowlers: 3,
            wicket_keepers: 1,
        }
    }
}

/// Tabular Q-learning parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Step size (alpha) of the temporal-difference update.
    pub learning_rate: f64,
    /// Discount (gamma) applied to the successor state's best value.
    pub discount: f64,
    /// Initial exploration rate.
    pub epsilon: f64,
    /// Exploration floor.
    pub min_epsilon: f64,
    /// Multiplicative decay applied once per acquisition.
    pub epsilon_decay: f64,
    /// Seed for the exploration RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            learning_rate: 0.8,
            discount: 0.95,
            epsilon: 0.5,
            min_epsilon: 0.05,
            epsilon_decay: 0.9,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub auction: AuctionConfig,
    pub quota: QuotaConfig,
    pub policy: PolicyConfig,
}

impl EngineConfig {
    /// Defaults with the given purse and foreign limit.
    pub fn new(total_budget: f64, foreign_limit: u32) -> Self {
        EngineConfig {
            auction: AuctionConfig {
                total_budget,
                foreign_limit,
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let budget = self.auction.total_budget;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(ValidationError::new(
                "auction.total_budget",
                format!("must be a positive number, got {budget}"),
            ));
        }

        let p = &self.policy;
        if !(p.learning_rate > 0.0 && p.learning_rate <= 1.0) {
            return Err(ValidationError::new(
                "policy.learning_rate",
                format!("must be in (0, 1], got {}", p.learning_rate),
            ));
        }
        let unit_fields: &[(&str, f64)] = &[
            ("policy.discount", p.discount),
            ("policy.epsilon", p.epsilon),
            ("policy.min_epsilon", p.min_epsilon),
        ];
        for (name, val) in unit_fields {
            if !(0.0..=1.0).contains(val) {
                return Err(ValidationError::new(
                    name,
                    format!("must be between 0.0 and 1.0 inclusive, got {val}"),
                ));
            }
        }
        if p.min_epsilon > p.epsilon {
            return Err(ValidationError::new(
                "policy.min_epsilon",
                format!(
                    "must not exceed policy.epsilon ({}), got {}",
                    p.epsilon, p.min_epsilon
                ),
            ));
        }
        if !(p.epsilon_decay > 0.0 && p.epsilon_decay <= 1.0) {
            return Err(ValidationError::new(
                "policy.epsilon_decay",
                format!("must be in (0, 1], got {}", p.epsilon_decay),
            ));
        }

        Ok(())
    }
}
