//! Forward algorithm: total probability of an emission sequence.
//!
//! `M[1][s] = trans(#, s) · emit(s, e₀)`
//! `M[t][s] = Σ_{s2} M[t-1][s2] · trans(s2, s) · emit(s, e_{t-1})`

use std::sync::Arc;

use crate::algorithms::trellis::Trellis;
use crate::engine::TrellisEngine;
use crate::model::{ProbabilityModel, State};
use crate::numeric::Domain;
use crate::traits::TrellisProblem;

/// Forward DP instance: fixed trellis over one emission sequence.
#[derive(Clone)]
pub struct ForwardProblem {
    pub trellis: Arc<Trellis>,
}

impl TrellisProblem for ForwardProblem {
    type Frontier = Vec<f64>;

    fn num_layers(&self) -> usize {
        self.trellis.len()
    }

    fn init_frontier(&self) -> Self::Frontier {
        self.trellis.first_layer()
    }

    fn forward_step(&self, layer: usize, f: &Self::Frontier) -> Self::Frontier {
        let tr = &self.trellis;
        let d = tr.domain;
        let n = tr.n_states();
        let mut next = vec![d.zero(); n];
        for (s_to, val) in next.iter_mut().enumerate() {
            *val = d.sum((0..n).map(|s_from| d.mul(f[s_from], tr.edge(layer, s_from, s_to))));
        }
        next
    }
}

/// Computes forward matrices against a borrowed model.
#[derive(Clone, Copy, Debug)]
pub struct ForwardScorer<'m> {
    model: &'m ProbabilityModel,
    domain: Domain,
}

impl<'m> ForwardScorer<'m> {
    pub fn new(model: &'m ProbabilityModel) -> Self {
        Self {
            model,
            domain: Domain::default(),
        }
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Run the forward recurrence over `emissions`.
    pub fn forward<S: AsRef<str>>(&self, emissions: &[S]) -> ForwardMatrix {
        let trellis = Arc::new(Trellis::new(self.model, emissions, self.domain));
        let engine = TrellisEngine::new(ForwardProblem {
            trellis: Arc::clone(&trellis),
        });
        let _span = tracing::debug_span!("forward", len = emissions.len()).entered();

        let mut rows = Vec::with_capacity(emissions.len() + 1);
        rows.push(vec![self.domain.zero(); trellis.n_states()]);
        rows.extend(engine.run());

        ForwardMatrix {
            domain: self.domain,
            states: trellis.states.clone(),
            rows,
        }
    }
}

/// Forward values `M[t][s]` for t in 0..=T.
///
/// Row 0 is unused and filled with the domain's zero; rows 1..=T hold the DP
/// values, stored in the scorer's [`Domain`].
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardMatrix {
    domain: Domain,
    states: Vec<State>,
    rows: Vec<Vec<f64>>,
}

impl ForwardMatrix {
    /// Sequence length T (the matrix has T + 1 rows).
    pub fn len(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Column labels.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Raw row `t` in the matrix's domain; `None` for t > T.
    pub fn row(&self, t: usize) -> Option<&[f64]> {
        self.rows.get(t).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Raw value of `M[t][state]`; `None` for an unknown state or t > T.
    pub fn value(&self, t: usize, state: &str) -> Option<f64> {
        let s = self.states.iter().position(|x| x == state)?;
        self.rows.get(t).map(|row| row[s])
    }

    /// `M[t][state]` as a plain probability.
    pub fn probability(&self, t: usize, state: &str) -> Option<f64> {
        self.value(t, state).map(|v| self.domain.to_probability(v))
    }

    /// Total sequence probability in the matrix's domain: sum of row T.
    ///
    /// The empty sequence has probability one.
    pub fn total(&self) -> f64 {
        if self.is_empty() {
            return self.domain.one();
        }
        let d = self.domain;
        d.sum(self.rows[self.len()].iter().copied())
    }

    /// Total sequence probability as a plain probability.
    pub fn total_probability(&self) -> f64 {
        self.domain.to_probability(self.total())
    }

    /// Natural log of the total sequence probability.
    pub fn log_total(&self) -> f64 {
        match self.domain {
            Domain::Log => self.total(),
            Domain::Probability => self.total().ln(),
        }
    }

    /// Per-step most likely state given the prefix, for t in 1..=T.
    ///
    /// This is filtering: each entry is chosen independently from its own
    /// row, so consecutive entries need not form a probable path. Use
    /// [`ViterbiDecoder`](crate::algorithms::viterbi::ViterbiDecoder) for
    /// the jointly most likely sequence. Ties go to the earliest state.
    ///
    /// One entry per emission, except for a model with no states: its rows
    /// are empty and the result is empty too.
    pub fn filtered_states(&self) -> Vec<&str> {
        self.rows[1..]
            .iter()
            .filter_map(|row| self.domain.first_argmax(row))
            .map(|s| self.states[s].as_str())
            .collect()
    }
}
