//! Generic trellis engine.
//!
//! Folds a [`TrellisProblem`] layer by layer and keeps every frontier, so
//! callers get the full `T × |states|` table back. Memory is linear in `T`;
//! sequences are expected to be short.
//!
//! With the `layer-spans` feature every layer runs inside a `trellis_layer`
//! trace span.

use crate::traits::TrellisProblem;

/// Runs a [`TrellisProblem`] to completion.
///
/// ```
/// use hmm_dp::{TrellisEngine, TrellisProblem};
///
/// struct Counter(usize);
/// impl TrellisProblem for Counter {
///     type Frontier = usize;
///     fn num_layers(&self) -> usize { self.0 }
///     fn init_frontier(&self) -> usize { 1 }
///     fn forward_step(&self, _layer: usize, f: &usize) -> usize { f * 2 }
/// }
///
/// let layers = TrellisEngine::new(Counter(4)).run();
/// assert_eq!(layers, vec![1, 2, 4, 8]);
/// ```
pub struct TrellisEngine<P: TrellisProblem> {
    problem: P,
}

impl<P: TrellisProblem> TrellisEngine<P> {
    pub fn new(problem: P) -> Self {
        Self { problem }
    }

    /// Expose immutable reference to the underlying problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Frontiers for layers 1..=T, in order. Empty when `T == 0`.
    pub fn run(&self) -> Vec<P::Frontier> {
        let t = self.problem.num_layers();
        let mut layers = Vec::with_capacity(t);
        if t == 0 {
            return layers;
        }

        let mut frontier = {
            #[cfg(feature = "layer-spans")]
            let _span = tracing::trace_span!("trellis_layer", layer = 1).entered();
            self.problem.init_frontier()
        };
        for layer in 1..t {
            #[cfg(feature = "layer-spans")]
            let _span = tracing::trace_span!("trellis_layer", layer = layer + 1).entered();
            let next = self.problem.forward_step(layer, &frontier);
            layers.push(std::mem::replace(&mut frontier, next));
        }
        layers.push(frontier);
        layers
    }

    /// Only the last frontier, without retaining the others.
    pub fn run_final(&self) -> Option<P::Frontier> {
        let t = self.problem.num_layers();
        if t == 0 {
            return None;
        }
        let mut frontier = self.problem.init_frontier();
        for layer in 1..t {
            frontier = self.problem.forward_step(layer, &frontier);
        }
        Some(frontier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Recorder {
        t: usize,
        steps: Cell<usize>,
    }

    impl TrellisProblem for Recorder {
        type Frontier = Vec<usize>;
        fn num_layers(&self) -> usize {
            self.t
        }
        fn init_frontier(&self) -> Self::Frontier {
            vec![1]
        }
        fn forward_step(&self, layer: usize, f: &Self::Frontier) -> Self::Frontier {
            self.steps.set(self.steps.get() + 1);
            assert_eq!(f.len(), layer, "frontier handed back for the wrong layer");
            let mut next = f.clone();
            next.push(layer + 1);
            next
        }
    }

    #[test]
    fn zero_layers_never_initialise() {
        struct Panicky;
        impl TrellisProblem for Panicky {
            type Frontier = ();
            fn num_layers(&self) -> usize {
                0
            }
            fn init_frontier(&self) -> Self::Frontier {
                panic!("init called for empty trellis");
            }
            fn forward_step(&self, _layer: usize, _f: &Self::Frontier) -> Self::Frontier {
                panic!("step called for empty trellis");
            }
        }
        assert!(TrellisEngine::new(Panicky).run().is_empty());
        assert!(TrellisEngine::new(Panicky).run_final().is_none());
    }

    #[test]
    fn layers_are_numbered_from_one() {
        let engine = TrellisEngine::new(Recorder {
            t: 4,
            steps: Cell::new(0),
        });
        let layers = engine.run();
        assert_eq!(layers.len(), 4);
        assert_eq!(layers[0], vec![1]);
        assert_eq!(layers[3], vec![1, 2, 3, 4]);
        assert_eq!(engine.problem().steps.get(), 3);
    }

    #[cfg(feature = "layer-spans")]
    #[test]
    fn spans_do_not_change_results() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let plain = TrellisEngine::new(Recorder {
            t: 5,
            steps: Cell::new(0),
        })
        .run();
        let traced = tracing::subscriber::with_default(subscriber, || {
            TrellisEngine::new(Recorder {
                t: 5,
                steps: Cell::new(0),
            })
            .run()
        });
        assert_eq!(plain, traced);
    }

    #[test]
    fn run_final_matches_last_layer() {
        let engine = TrellisEngine::new(Recorder {
            t: 6,
            steps: Cell::new(0),
        });
        let all = engine.run();
        assert_eq!(engine.run_final().as_ref(), all.last());
    }
}
