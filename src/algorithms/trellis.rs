//! Dense, domain-lifted view of a model for one emission sequence.

use crate::model::{ProbabilityModel, State, START_STATE};
use crate::numeric::Domain;

/// Model tables indexed by state position, restricted to the symbols of one
/// observation sequence and already converted into a [`Domain`].
///
/// Absent table entries become `domain.zero()`, following
/// [`MISSING_PROBABILITY`](crate::model::MISSING_PROBABILITY).
#[derive(Clone, Debug)]
pub struct Trellis {
    pub domain: Domain,
    /// States in enumeration order; index `s` below refers to `states[s]`.
    pub states: Vec<State>,
    /// start[s] = trans(#, s)
    pub start: Vec<f64>,
    /// trans[s_from][s_to]
    pub trans: Vec<Vec<f64>>,
    /// emit[t][s] = emission(s, emissions[t]), t zero-based
    pub emit: Vec<Vec<f64>>,
}

impl Trellis {
    pub fn new<S: AsRef<str>>(model: &ProbabilityModel, emissions: &[S], domain: Domain) -> Self {
        let states = model.states().to_vec();
        let start = states
            .iter()
            .map(|s| domain.lift(model.transition(START_STATE, s)))
            .collect();
        let trans = states
            .iter()
            .map(|from| {
                states
                    .iter()
                    .map(|to| domain.lift(model.transition(from, to)))
                    .collect()
            })
            .collect();
        let emit = emissions
            .iter()
            .map(|symbol| {
                states
                    .iter()
                    .map(|s| domain.lift(model.emission(s, symbol.as_ref())))
                    .collect()
            })
            .collect();
        Self {
            domain,
            states,
            start,
            trans,
            emit,
        }
    }

    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// Number of layers T.
    pub fn len(&self) -> usize {
        self.emit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emit.is_empty()
    }

    /// Layer 1: `start[s] · emit[0][s]`.
    pub fn first_layer(&self) -> Vec<f64> {
        let d = self.domain;
        (0..self.n_states())
            .map(|s| d.mul(self.start[s], self.emit[0][s]))
            .collect()
    }

    /// Weight of the edge (s_from at layer t) → (s_to at layer t + 1).
    ///
    /// `layer` is the 1-based index of the source layer; the target layer
    /// consumes `emissions[layer]`.
    #[inline]
    pub fn edge(&self, layer: usize, s_from: usize, s_to: usize) -> f64 {
        self.domain
            .mul(self.trans[s_from][s_to], self.emit[layer][s_to])
    }
}
