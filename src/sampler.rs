//! Weighted random walk over a [`ProbabilityModel`].

use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{HmmError, Result};
use crate::model::{ProbabilityModel, State, START_STATE};
use crate::observation::Observation;

/// Draws synthetic observations from a model.
///
/// The random source is always supplied by the caller, so a seeded
/// `StdRng` reproduces the same sequence.
///
/// ```
/// use hmm_dp::{ModelBuilder, Sampler};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let model = ModelBuilder::new()
///     .transition("#", "A", 1.0)
///     .transition("A", "A", 1.0)
///     .emission("A", "x", 1.0)
///     .build()
///     .unwrap();
/// let obs = Sampler::new(&model)
///     .generate(3, &mut StdRng::seed_from_u64(7))
///     .unwrap();
/// assert_eq!(obs.to_string(), "A A A\nx x x\n");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'m> {
    model: &'m ProbabilityModel,
}

impl<'m> Sampler<'m> {
    pub fn new(model: &'m ProbabilityModel) -> Self {
        Self { model }
    }

    /// Walk `n` steps from [`START_STATE`], emitting one symbol per step.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Observation> {
        let mut states = Vec::with_capacity(n);
        let mut emissions = Vec::with_capacity(n);
        let mut current = START_STATE.to_owned();

        for _ in 0..n {
            let successors = self
                .model
                .successors(&current)
                .ok_or_else(|| HmmError::UnknownState(current.clone()))?;
            let next = weighted_choice(successors, &current, rng)?;

            let outputs = self
                .model
                .emission_distribution(&next)
                .ok_or_else(|| HmmError::UnknownEmission(next.clone()))?;
            let symbol = weighted_choice(outputs, &next, rng)?;

            states.push(next.clone());
            emissions.push(symbol);
            current = next;
        }

        tracing::trace!(n, "generated observation");
        Ok(Observation::new(states, emissions))
    }
}

fn weighted_choice<R: Rng + ?Sized>(
    distribution: &BTreeMap<String, f64>,
    owner: &State,
    rng: &mut R,
) -> Result<String> {
    let weights = WeightedIndex::new(distribution.values().copied()).map_err(|err| {
        HmmError::DegenerateDistribution {
            owner: owner.clone(),
            reason: err.to_string(),
        }
    })?;
    let idx = weights.sample(rng);
    // WeightedIndex yields an index into the iterator it was built from.
    let (key, _) = distribution
        .iter()
        .nth(idx)
        .ok_or_else(|| HmmError::DegenerateDistribution {
            owner: owner.clone(),
            reason: format!("index {idx} out of range"),
        })?;
    Ok(key.clone())
}
