//! Trellis algorithms over a [`ProbabilityModel`](crate::model::ProbabilityModel).
//!
//! Each algorithm implements [`TrellisProblem`](crate::traits::TrellisProblem)
//! and is driven by [`TrellisEngine`](crate::engine::TrellisEngine):
//! - [`forward`] : forward matrix and total sequence probability (sum).
//! - [`viterbi`] : most probable state path (max with backpointers).
//! - [`trellis`] : the dense, domain-lifted tables both of them read.

pub mod forward;
pub mod trellis;
pub mod viterbi;
