//! Example: Viterbi decoding of letters into consonant/vowel states.
//!
//! Run with:
//! `cargo run --example viterbi`

use hmm_dp::{ForwardScorer, ModelBuilder, ViterbiDecoder};

fn main() {
    // Two hidden states, C (consonant) and V (vowel), emitting letters.
    // Purely illustrative; real tables come from `hmm_dp::load`.
    let model = ModelBuilder::new()
        .transition("#", "C", 0.81)
        .transition("#", "V", 0.19)
        .transition("C", "C", 0.63)
        .transition("C", "V", 0.37)
        .transition("V", "C", 0.60)
        .transition("V", "V", 0.40)
        .emission("C", "a", 0.3)
        .emission("C", "b", 0.7)
        .emission("V", "a", 0.9)
        .emission("V", "b", 0.1)
        .build()
        .expect("demo tables are valid");

    let obs = ["b", "a", "a", "b", "a", "b", "b"];

    let path = ViterbiDecoder::new(&model).viterbi(&obs);
    let forward = ForwardScorer::new(&model).forward(&obs);

    println!("Best path probability: {:e}", path.probability());
    println!("Sequence probability:  {:e}", forward.total_probability());
    println!("State sequence:");
    for (t, (state, symbol)) in path.states().iter().zip(obs).enumerate() {
        println!("  t = {:2}, emits {symbol}, state = {state}", t + 1);
    }
    println!("Filtered (per-step argmax): {}", forward.filtered_states().join(" "));
}
