use crate::error::{HmmError, Result};
use crate::model::{EmissionTable, ProbabilityModel, StateOrder, TransitionTable};

/// Programmatic construction of a [`ProbabilityModel`].
///
/// ```
/// use hmm_dp::ModelBuilder;
///
/// let model = ModelBuilder::new()
///     .transition("#", "H", 1.0)
///     .transition("H", "H", 1.0)
///     .emission("H", "heads", 0.5)
///     .emission("H", "tails", 0.5)
///     .build()
///     .unwrap();
/// assert_eq!(model.states(), ["H"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ModelBuilder {
    transitions: Vec<(String, String, f64)>,
    emissions: Vec<(String, String, f64)>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transition(mut self, from: &str, to: &str, probability: f64) -> Self {
        self.transitions
            .push((from.to_owned(), to.to_owned(), probability));
        self
    }

    pub fn emission(mut self, state: &str, symbol: &str, probability: f64) -> Self {
        self.emissions
            .push((state.to_owned(), symbol.to_owned(), probability));
        self
    }

    /// Validate every probability and freeze the model.
    ///
    /// Later records for the same key overwrite earlier ones.
    pub fn build(self) -> Result<ProbabilityModel> {
        let mut order = StateOrder::default();
        let mut transitions = TransitionTable::new();
        for (from, to, p) in self.transitions {
            check(&from, &to, p)?;
            order.observe(&from, &to);
            transitions.entry(from).or_default().insert(to, p);
        }
        let mut emissions = EmissionTable::new();
        for (state, symbol, p) in self.emissions {
            check(&state, &symbol, p)?;
            emissions.entry(state).or_default().insert(symbol, p);
        }
        Ok(ProbabilityModel::from_parts(
            transitions,
            emissions,
            order.into_vec(),
        ))
    }
}

fn check(from: &str, to: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(HmmError::InvalidProbability {
            from: from.to_owned(),
            to: to.to_owned(),
            value,
        })
    }
}
