//! Core trait for layered (trellis-shaped) dynamic programs.
//!
//! The forward scorer and the Viterbi decoder share one structure: layers
//! 1..=T, one per observed symbol, where every layer depends only on the
//! previous one and on fixed model data. Implement [`TrellisProblem`] for a
//! struct that captures the instance and hand it to
//! [`TrellisEngine`](crate::engine::TrellisEngine).

/// A fixed DP instance laid out as consecutive layers.
///
/// Semantics:
/// - There are `T = num_layers()` layers, numbered 1..=T.
/// - `init_frontier()` produces layer 1 directly from the start row.
/// - `forward_step(t, frontier_t)` maps layer `t` to layer `t + 1`.
/// - Layer 0 is never materialized.
pub trait TrellisProblem {
    /// All DP values (and any per-cell bookkeeping) of one layer.
    type Frontier: Clone;

    /// Number of layers `T`. May be zero, in which case neither
    /// `init_frontier` nor `forward_step` is called.
    fn num_layers(&self) -> usize;

    /// Layer 1.
    fn init_frontier(&self) -> Self::Frontier;

    /// Compute layer `layer + 1` from layer `layer`.
    ///
    /// Must only depend on `frontier` and fixed problem data.
    fn forward_step(&self, layer: usize, frontier: &Self::Frontier) -> Self::Frontier;
}
