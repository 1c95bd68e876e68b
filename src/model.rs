//! The read-only probability model shared by every algorithm.
//!
//! A [`ProbabilityModel`] owns two typed two-level maps:
//! - transitions: source state (including [`START_STATE`]) → destination → p
//! - emissions:   state → symbol → p
//!
//! plus the ordered list of hidden states. The order of that list is the
//! enumeration order used by every tie-break in the crate: states appear in
//! the order they are first mentioned by a transition record (source before
//! destination), with [`START_STATE`] excluded.

use std::collections::{BTreeMap, BTreeSet};

/// A hidden state token.
pub type State = String;
/// An observable symbol token.
pub type Symbol = String;

/// state → state → probability. Sources may include [`START_STATE`].
pub type TransitionTable = BTreeMap<State, BTreeMap<State, f64>>;
/// state → symbol → probability.
pub type EmissionTable = BTreeMap<State, BTreeMap<Symbol, f64>>;

/// Reserved, source-only start state.
pub const START_STATE: &str = "#";

/// Probability assumed for any transition or emission absent from the tables.
///
/// Lookups never fail. A symbol no state can emit therefore collapses the
/// whole trellis layer to zero, and everything after it stays zero.
pub const MISSING_PROBABILITY: f64 = 0.0;

/// Immutable HMM parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbabilityModel {
    transitions: TransitionTable,
    emissions: EmissionTable,
    states: Vec<State>,
}

impl ProbabilityModel {
    /// Assemble a model from tables and an explicit state order.
    pub(crate) fn from_parts(
        transitions: TransitionTable,
        emissions: EmissionTable,
        states: Vec<State>,
    ) -> Self {
        debug_assert!(states.iter().all(|s| s != START_STATE));
        Self {
            transitions,
            emissions,
            states,
        }
    }

    /// Hidden states in enumeration order (never contains [`START_STATE`]).
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Position of `state` in the enumeration order.
    pub fn state_index(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn emissions(&self) -> &EmissionTable {
        &self.emissions
    }

    /// Outgoing distribution of `from`, if it has any entries.
    pub fn successors(&self, from: &str) -> Option<&BTreeMap<State, f64>> {
        self.transitions.get(from).filter(|row| !row.is_empty())
    }

    /// Emission distribution of `state`, if it has any entries.
    pub fn emission_distribution(&self, state: &str) -> Option<&BTreeMap<Symbol, f64>> {
        self.emissions.get(state).filter(|row| !row.is_empty())
    }

    /// P(to | from), or [`MISSING_PROBABILITY`] when absent.
    pub fn transition(&self, from: &str, to: &str) -> f64 {
        self.transitions
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(MISSING_PROBABILITY)
    }

    /// P(symbol | state), or [`MISSING_PROBABILITY`] when absent.
    pub fn emission(&self, state: &str, symbol: &str) -> f64 {
        self.emissions
            .get(state)
            .and_then(|row| row.get(symbol))
            .copied()
            .unwrap_or(MISSING_PROBABILITY)
    }
}

/// Tracks first-mention order of states while records stream in.
#[derive(Debug, Default)]
pub(crate) struct StateOrder {
    seen: BTreeSet<State>,
    order: Vec<State>,
}

impl StateOrder {
    /// Record a transition's endpoints, source first.
    pub(crate) fn observe(&mut self, from: &str, to: &str) {
        self.push(from);
        self.push(to);
    }

    fn push(&mut self, state: &str) {
        if state != START_STATE && self.seen.insert(state.to_owned()) {
            self.order.push(state.to_owned());
        }
    }

    pub(crate) fn into_vec(self) -> Vec<State> {
        self.order
    }
}
