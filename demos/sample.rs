//! Example: load a model from disk and sample from it.
//!
//! Run with:
//! `cargo run --example sample -- data/cv 12 7`

use std::env;

use hmm_dp::{load, Sampler, ViterbiDecoder};
use rand::{rngs::StdRng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let basename = args.next().unwrap_or_else(|| "data/cv".to_string());
    let n: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(12);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(7);

    let model = load(&basename)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let obs = Sampler::new(&model).generate(n, &mut rng)?;
    print!("{obs}");

    let decoded = ViterbiDecoder::new(&model).decode(obs.emissions());
    println!("{}", decoded.join(" "));
    Ok(())
}
