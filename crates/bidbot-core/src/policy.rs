// Tabular Q-learning over {bid, skip} with epsilon-greedy exploration.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::PolicyConfig;
use crate::state::StateKey;

/// Optimistic initial value for both actions of a newly visited state.
pub const INITIAL_VALUE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Bid,
    Skip,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bid => f.write_str("bid"),
            Action::Skip => f.write_str("skip"),
        }
    }
}

/// Learned values of both actions in one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionValues {
    pub bid: f64,
    pub skip: f64,
}

impl Default for ActionValues {
    fn default() -> Self {
        ActionValues {
            bid: INITIAL_VALUE,
            skip: INITIAL_VALUE,
        }
    }
}

impl ActionValues {
    fn get_mut(&mut self, action: Action) -> &mut f64 {
        match action {
            Action::Bid => &mut self.bid,
            Action::Skip => &mut self.skip,
        }
    }

    /// Greedy action. Exact ties go to `Bid`.
    pub fn best(&self) -> Action {
        if self.skip > self.bid {
            Action::Skip
        } else {
            Action::Bid
        }
    }

    pub fn max(&self) -> f64 {
        self.bid.max(self.skip)
    }
}

/// Value table plus exploration schedule for one auction session.
#[derive(Debug, Clone)]
pub struct ValuePolicy {
    table: HashMap<StateKey, ActionValues>,
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
    min_epsilon: f64,
    epsilon_decay: f64,
}

impl ValuePolicy {
    pub fn new(config: &PolicyConfig) -> Self {
        ValuePolicy {
            table: HashMap::new(),
            learning_rate: config.learning_rate,
            discount: config.discount,
            epsilon: config.epsilon,
            min_epsilon: config.min_epsilon,
            epsilon_decay: config.epsilon_decay,
        }
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of states visited so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Values for `state`, if it has been visited.
    pub fn values(&self, state: &StateKey) -> Option<&ActionValues> {
        self.table.get(state)
    }

    fn visit(&mut self, state: StateKey) -> &mut ActionValues {
        self.table.entry(state).or_default()
    }

    /// Epsilon-greedy choice in `state`, initializing it on first visit.
    pub fn select_action<G: Rng>(&mut self, state: StateKey, rng: &mut G) -> Action {
        let epsilon = self.epsilon;
        let values = *self.visit(state);
        if rng.gen::<f64>() < epsilon {
            let action = if rng.gen_bool(0.5) {
                Action::Bid
            } else {
                Action::Skip
            };
            trace!(?state, %action, epsilon, "exploring");
            action
        } else {
            values.best()
        }
    }

    /// One-step Q-learning update:
    /// `Q(s,a) += alpha * (reward + gamma * max_a' Q(s',a') - Q(s,a))`.
    ///
    /// Both states are initialized if unseen. Returns the updated value.
    pub fn update(
        &mut self,
        old_state: StateKey,
        action: Action,
        reward: f64,
        new_state: StateKey,
    ) -> f64 {
        let future = self.visit(new_state).max();
        let (alpha, gamma) = (self.learning_rate, self.discount);
        let value = self.visit(old_state).get_mut(action);
        let old = *value;
        *value = old + alpha * (reward + gamma * future - old);
        *value
    }

    /// `epsilon = max(min_epsilon, epsilon * decay)`.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
    }

    #[cfg(test)]
    pub(crate) fn set_values(&mut self, state: StateKey, values: ActionValues) {
        self.table.insert(state, values);
    }
}
