//! Numeric domains for trellis accumulation.
//!
//! Repeated products of probabilities underflow toward zero on long
//! sequences. [`Domain::Log`] stores natural logarithms instead; it is never
//! switched on implicitly.
//!
//! Products that tie exactly as probabilities can land an ulp apart once
//! they are sums of logarithms, so log-domain comparisons treat values within
//! [`LOG_TIE_TOLERANCE`] as equal. Both domains then keep the earliest state.

/// Relative slack under which two log-domain scores count as a tie.
pub const LOG_TIE_TOLERANCE: f64 = 1e-12;

/// Representation of probability values inside a trellis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Domain {
    /// Plain probabilities in [0, 1].
    #[default]
    Probability,
    /// Natural logarithms; probability 0 is `-inf`.
    Log,
}

impl Domain {
    /// The additive identity (probability 0).
    #[inline]
    pub fn zero(self) -> f64 {
        match self {
            Domain::Probability => 0.0,
            Domain::Log => f64::NEG_INFINITY,
        }
    }

    /// The multiplicative identity (probability 1).
    #[inline]
    pub fn one(self) -> f64 {
        match self {
            Domain::Probability => 1.0,
            Domain::Log => 0.0,
        }
    }

    /// Convert a plain probability into this domain.
    #[inline]
    pub fn lift(self, p: f64) -> f64 {
        match self {
            Domain::Probability => p,
            Domain::Log => p.ln(),
        }
    }

    /// Convert a value of this domain back to a plain probability.
    #[inline]
    pub fn to_probability(self, v: f64) -> f64 {
        match self {
            Domain::Probability => v,
            Domain::Log => v.exp(),
        }
    }

    #[inline]
    pub fn mul(self, a: f64, b: f64) -> f64 {
        match self {
            Domain::Probability => a * b,
            Domain::Log => a + b,
        }
    }

    #[inline]
    pub fn add(self, a: f64, b: f64) -> f64 {
        match self {
            Domain::Probability => a + b,
            Domain::Log => log_sum_exp(a, b),
        }
    }

    /// Sum of a sequence of values in this domain.
    pub fn sum<I: IntoIterator<Item = f64>>(self, values: I) -> f64 {
        values
            .into_iter()
            .fold(self.zero(), |acc, v| self.add(acc, v))
    }

    /// Whether `cand` should replace the running best `best`.
    ///
    /// Strict `>` in the probability domain. In the log domain `cand` must
    /// also clear `best` by more than the tie tolerance.
    #[inline]
    pub fn exceeds(self, cand: f64, best: f64) -> bool {
        match self {
            Domain::Probability => cand > best,
            Domain::Log if !best.is_finite() => cand > best,
            Domain::Log => cand - best > LOG_TIE_TOLERANCE * best.abs().max(1.0),
        }
    }

    /// Index of the first maximum; `None` for an empty slice.
    ///
    /// NaN never replaces the running best, so a NaN in position 0 wins only
    /// if nothing after it compares greater.
    pub fn first_argmax(self, values: &[f64]) -> Option<usize> {
        let mut iter = values.iter().enumerate();
        let (mut best_idx, mut best) = iter.next().map(|(i, &v)| (i, v))?;
        for (i, &v) in iter {
            if self.exceeds(v, best) || (best.is_nan() && !v.is_nan()) {
                best = v;
                best_idx = i;
            }
        }
        Some(best_idx)
    }
}

/// `ln(exp(a) + exp(b))` without leaving log space.
fn log_sum_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let max = a.max(b);
    max + ((a - max).exp() + (b - max).exp()).ln()
}
