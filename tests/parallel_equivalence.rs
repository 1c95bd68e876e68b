#![cfg(feature = "parallel")]

use hmm_dp::driver::{parse_cases, run_forward_cases, run_viterbi_cases};
use hmm_dp::{Domain, ForwardScorer, ModelBuilder, ProbabilityModel, ViterbiDecoder};
use proptest::prelude::*;

fn demo_model() -> ProbabilityModel {
    ModelBuilder::new()
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
        .unwrap()
}

proptest! {
    #[test]
    fn batch_matches_sequential(lines in prop::collection::vec("[ab]( [ab]){0,12}", 1..24)) {
        let model = demo_model();
        let text = lines.join("\n\n");
        let cases = parse_cases(&text);
        prop_assert_eq!(cases.len(), lines.len());

        let decoded = run_viterbi_cases(&model, &cases, Domain::Probability);
        let scored = run_forward_cases(&model, &cases, Domain::Probability);
        for ((case, d), f) in cases.iter().zip(&decoded).zip(&scored) {
            let emissions = case.observation.emissions();
            prop_assert_eq!(&d.decoded, &ViterbiDecoder::new(&model).decode(emissions));
            let expected = ForwardScorer::new(&model).forward(emissions).total_probability();
            prop_assert_eq!(f.total_probability, expected);
        }
    }
}
