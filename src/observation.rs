//! Paired state / emission sequences.

use std::fmt;

use crate::model::{State, Symbol};

/// Placeholder printed for a state that was not observed.
pub const UNKNOWN_STATE: &str = "?";

/// A state sequence aligned with an emission sequence.
///
/// Sampled observations carry every state; observations tokenized from text
/// carry `None` in every state slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    states: Vec<Option<State>>,
    emissions: Vec<Symbol>,
}

impl Observation {
    /// Fully observed sequence.
    ///
    /// # Panics
    /// Panics if the two sequences differ in length.
    pub fn new(states: Vec<State>, emissions: Vec<Symbol>) -> Self {
        assert_eq!(
            states.len(),
            emissions.len(),
            "state and emission sequences must align"
        );
        Self {
            states: states.into_iter().map(Some).collect(),
            emissions,
        }
    }

    /// Emissions only; every state is unknown.
    pub fn from_emissions(emissions: Vec<Symbol>) -> Self {
        Self {
            states: vec![None; emissions.len()],
            emissions,
        }
    }

    /// Whitespace-tokenize a line of raw text.
    pub fn tokenize(text: &str) -> Self {
        Self::from_emissions(text.split_whitespace().map(str::to_owned).collect())
    }

    pub fn states(&self) -> &[Option<State>] {
        &self.states
    }

    pub fn emissions(&self) -> &[Symbol] {
        &self.emissions
    }

    /// The states, if every one of them is known.
    pub fn known_states(&self) -> Option<Vec<&str>> {
        self.states.iter().map(|s| s.as_deref()).collect()
    }

    pub fn len(&self) -> usize {
        self.emissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<&str> = self
            .states
            .iter()
            .map(|s| s.as_deref().unwrap_or(UNKNOWN_STATE))
            .collect();
        writeln!(f, "{}", states.join(" "))?;
        writeln!(f, "{}", self.emissions.join(" "))
    }
}
