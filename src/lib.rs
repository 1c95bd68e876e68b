//! First-order Hidden Markov Models on a layered DP engine.
//!
//! A model is a reserved start state `#`, a set of hidden states, a
//! transition table and an emission table. On top of one immutable
//! [`ProbabilityModel`] the crate offers:
//!
//! 1. [`Sampler`]: draw a synthetic state/emission sequence with an
//!    injected random source.
//! 2. [`ForwardScorer`]: the forward matrix and total probability of an
//!    emission sequence.
//! 3. [`ViterbiDecoder`]: the most probable hidden-state path.
//!
//! Scoring and decoding are both expressed as a [`TrellisProblem`] (one
//! layer per observed symbol) and folded by [`TrellisEngine`].
//!
//! ## Quick start
//! ```
//! use hmm_dp::{ModelBuilder, ViterbiDecoder, ForwardScorer};
//!
//! let model = ModelBuilder::new()
//!     .transition("#", "C", 0.81).transition("#", "V", 0.19)
//!     .transition("C", "C", 0.63).transition("C", "V", 0.37)
//!     .transition("V", "C", 0.60).transition("V", "V", 0.40)
//!     .emission("C", "a", 0.3).emission("C", "b", 0.7)
//!     .emission("V", "a", 0.9).emission("V", "b", 0.1)
//!     .build()
//!     .unwrap();
//!
//! let path = ViterbiDecoder::new(&model).decode(&["b", "a"]);
//! assert_eq!(path, ["C", "V"]);
//!
//! let p = ForwardScorer::new(&model).forward(&["b", "a"]).total_probability();
//! assert!((p - 0.306234).abs() < 1e-9);
//! ```
//!
//! ## Missing entries
//! A transition or emission absent from the tables has probability
//! [`model::MISSING_PROBABILITY`] (zero). The algorithms never fail on
//! them; an unexplainable symbol zeroes its whole layer and ties are then
//! broken toward the earliest state.
//!
//! ## Numeric domain
//! Values are plain probabilities by default. Long sequences can underflow;
//! opt into [`Domain::Log`] with `with_domain` on the scorer or decoder.

pub mod algorithms;
pub mod builder;
pub mod driver;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod numeric;
pub mod observation;
pub mod sampler;
pub mod traits;

pub use crate::algorithms::forward::{ForwardMatrix, ForwardScorer};
pub use crate::algorithms::viterbi::{ViterbiDecoder, ViterbiPath};
pub use crate::builder::ModelBuilder;
pub use crate::engine::TrellisEngine;
pub use crate::error::{HmmError, Result};
pub use crate::loader::{load, load_with, LoadOptions, MalformedPolicy};
pub use crate::model::{ProbabilityModel, State, Symbol, START_STATE};
pub use crate::numeric::Domain;
pub use crate::observation::Observation;
pub use crate::sampler::Sampler;
pub use crate::traits::TrellisProblem;
