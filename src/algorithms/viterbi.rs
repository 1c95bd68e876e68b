//! Viterbi decoding: the single most probable hidden-state path.
//!
//! Same layered structure as the forward algorithm with `max` in place of
//! `Σ`, plus a backpointer per cell. Ties (including whole layers collapsed
//! to zero) always resolve to the earliest state in enumeration order.

use std::sync::Arc;

use crate::algorithms::trellis::Trellis;
use crate::engine::TrellisEngine;
use crate::model::{ProbabilityModel, State};
use crate::numeric::Domain;
use crate::traits::TrellisProblem;

/// Viterbi DP instance: fixed trellis over one emission sequence.
#[derive(Clone)]
pub struct ViterbiProblem {
    pub trellis: Arc<Trellis>,
}

/// One trellis layer of the max recurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct ViterbiLayer {
    /// Best path score ending in each state at this layer.
    pub scores: Vec<f64>,
    /// Predecessor index achieving `scores[s]`; `None` on layer 1.
    pub backpointers: Vec<Option<usize>>,
}

impl TrellisProblem for ViterbiProblem {
    type Frontier = ViterbiLayer;

    fn num_layers(&self) -> usize {
        self.trellis.len()
    }

    fn init_frontier(&self) -> Self::Frontier {
        let scores = self.trellis.first_layer();
        let backpointers = vec![None; scores.len()];
        ViterbiLayer {
            scores,
            backpointers,
        }
    }

    fn forward_step(&self, layer: usize, f: &Self::Frontier) -> Self::Frontier {
        let tr = &self.trellis;
        let d = tr.domain;
        let n = tr.n_states();
        let mut scores = vec![d.zero(); n];
        let mut backpointers = vec![None; n];
        if n == 0 {
            return ViterbiLayer {
                scores,
                backpointers,
            };
        }
        for s_to in 0..n {
            // Seed with the first predecessor; only a strictly greater
            // candidate (beyond log-domain rounding) replaces it.
            let mut best = d.mul(f.scores[0], tr.edge(layer, 0, s_to));
            let mut arg = 0;
            for s_from in 1..n {
                let cand = d.mul(f.scores[s_from], tr.edge(layer, s_from, s_to));
                if d.exceeds(cand, best) {
                    best = cand;
                    arg = s_from;
                }
            }
            scores[s_to] = best;
            backpointers[s_to] = Some(arg);
        }
        ViterbiLayer {
            scores,
            backpointers,
        }
    }
}

/// Decodes emission sequences against a borrowed model.
#[derive(Clone, Copy, Debug)]
pub struct ViterbiDecoder<'m> {
    model: &'m ProbabilityModel,
    domain: Domain,
}

impl<'m> ViterbiDecoder<'m> {
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

    /// Run the max recurrence and backtrack the best path.
    pub fn viterbi<S: AsRef<str>>(&self, emissions: &[S]) -> ViterbiPath {
        let _span = tracing::debug_span!("viterbi", len = emissions.len()).entered();
        let trellis = Arc::new(Trellis::new(self.model, emissions, self.domain));
        let engine = TrellisEngine::new(ViterbiProblem {
            trellis: Arc::clone(&trellis),
        });
        let layers = engine.run();
        let lattice = ViterbiLattice {
            domain: self.domain,
            states: trellis.states.clone(),
            layers,
        };

        let (path, score) = match lattice.best_final() {
            Some(last) => (lattice.backtrack(last), lattice.layers[lattice.len() - 1].scores[last]),
            None if emissions.is_empty() => (Vec::new(), self.domain.one()),
            // A model without states cannot explain a non-empty sequence.
            None => (Vec::new(), self.domain.zero()),
        };

        ViterbiPath {
            domain: self.domain,
            states: path,
            score,
            lattice,
        }
    }

    /// Just the decoded state sequence.
    pub fn decode<S: AsRef<str>>(&self, emissions: &[S]) -> Vec<State> {
        self.viterbi(emissions).states
    }
}

/// All layers of one Viterbi run, labelled with their states.
#[derive(Clone, Debug, PartialEq)]
pub struct ViterbiLattice {
    domain: Domain,
    states: Vec<State>,
    layers: Vec<ViterbiLayer>,
}

impl ViterbiLattice {
    /// Number of layers T.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Layer `t`, 1-based.
    pub fn layer(&self, t: usize) -> Option<&ViterbiLayer> {
        t.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    /// Best score of a path ending in `state` at layer `t`.
    pub fn score(&self, t: usize, state: &str) -> Option<f64> {
        let s = self.index(state)?;
        self.layer(t).map(|l| l.scores[s])
    }

    /// Predecessor of `state` at layer `t` on its best path.
    pub fn backpointer(&self, t: usize, state: &str) -> Option<&str> {
        let s = self.index(state)?;
        let prev = self.layer(t)?.backpointers[s]?;
        Some(self.states[prev].as_str())
    }

    fn index(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|x| x == state)
    }

    fn best_final(&self) -> Option<usize> {
        self.layers
            .last()
            .and_then(|l| self.domain.first_argmax(&l.scores))
    }

    fn backtrack(&self, last: usize) -> Vec<State> {
        let mut path = Vec::with_capacity(self.layers.len());
        let mut s = last;
        path.push(self.states[s].clone());
        for layer in self.layers[1..].iter().rev() {
            // Every layer past the first carries a backpointer per state.
            s = layer.backpointers[s].unwrap_or(0);
            path.push(self.states[s].clone());
        }
        path.reverse();
        path
    }
}

/// Result of [`ViterbiDecoder::viterbi`].
///
/// The path has one state per emission, with one exception: a model that
/// has no states at all decodes any sequence to an empty path with score
/// zero, since there is nothing to align the emissions with.
#[derive(Clone, Debug, PartialEq)]
pub struct ViterbiPath {
    domain: Domain,
    states: Vec<State>,
    score: f64,
    lattice: ViterbiLattice,
}

impl ViterbiPath {
    /// Decoded states, aligned position by position with the emissions.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn into_states(self) -> Vec<State> {
        self.states
    }

    /// Joint probability of the path and the emissions, in the decoder's domain.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// [`score`](Self::score) as a plain probability.
    pub fn probability(&self) -> f64 {
        self.domain.to_probability(self.score)
    }

    pub fn lattice(&self) -> &ViterbiLattice {
        &self.lattice
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelBuilder;

    fn coin() -> ProbabilityModel {
        ModelBuilder::new()
            .transition("#", "F", 0.5)
            .transition("#", "L", 0.5)
            .transition("F", "F", 0.9)
            .transition("F", "L", 0.1)
            .transition("L", "F", 0.2)
            .transition("L", "L", 0.8)
            .emission("F", "H", 0.5)
            .emission("F", "T", 0.5)
            .emission("L", "H", 0.8)
            .emission("L", "T", 0.2)
            .build()
            .unwrap()
    }

    #[test]
    fn first_layer_has_no_backpointers() {
        let m = coin();
        let vp = ViterbiDecoder::new(&m).viterbi(&["H", "T"]);
        let first = vp.lattice().layer(1).unwrap();
        assert!(first.backpointers.iter().all(Option::is_none));
        assert!(vp.lattice().layer(0).is_none());
        assert!(vp.lattice().layer(3).is_none());
        assert_eq!(vp.lattice().backpointer(2, "F"), Some("F"));
    }

    #[test]
    fn empty_sequence_decodes_to_empty_path() {
        let m = coin();
        let vp = ViterbiDecoder::new(&m).viterbi::<&str>(&[]);
        assert!(vp.is_empty());
        assert!(vp.lattice().is_empty());
        assert_eq!(vp.probability(), 1.0);
    }

    #[test]
    fn stateless_model_decodes_nothing() {
        let m = ProbabilityModel::default();
        let vp = ViterbiDecoder::new(&m).viterbi(&["H", "H"]);
        assert!(vp.is_empty());
        assert_eq!(vp.probability(), 0.0);
    }

    #[test]
    fn long_heads_run_stays_loaded() {
        let m = coin();
        let obs = vec!["H"; 8];
        let path = ViterbiDecoder::new(&m).decode(&obs);
        assert_eq!(path.len(), 8);
        assert!(path.iter().all(|s| s == "L"));
    }

    /// `0.3 · 1.0` and `0.6 · 0.5` tie exactly as probabilities.
    fn exact_tie() -> ProbabilityModel {
        ModelBuilder::new()
            .transition("#", "B", 0.3)
            .transition("#", "A", 0.6)
            .transition("B", "B", 1.0)
            .transition("A", "B", 1.0)
            .emission("B", "x", 1.0)
            .emission("A", "x", 0.5)
            .build()
            .unwrap()
    }

    #[test]
    fn exact_ties_resolve_alike_in_both_domains() {
        let m = exact_tie();
        assert_eq!(m.states(), ["B", "A"]);
        for domain in [Domain::Probability, Domain::Log] {
            let dec = ViterbiDecoder::new(&m).with_domain(domain);
            assert_eq!(dec.decode(&["x"]), ["B"], "{domain:?}");
            let vp = dec.viterbi(&["x", "x"]);
            assert_eq!(vp.states(), ["B", "B"], "{domain:?}");
            assert_eq!(vp.lattice().backpointer(2, "B"), Some("B"), "{domain:?}");
        }
    }

    #[test]
    fn log_domain_decodes_same_path() {
        let m = coin();
        let obs = ["H", "T", "T", "H", "H", "H", "T", "T", "T", "T"];
        let lin = ViterbiDecoder::new(&m).viterbi(&obs);
        let log = ViterbiDecoder::new(&m).with_domain(Domain::Log).viterbi(&obs);
        assert_eq!(lin.states(), log.states());
        assert!((lin.probability() - log.probability()).abs() < 1e-12);
    }
}
