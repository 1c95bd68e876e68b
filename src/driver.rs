//! Batch runner for "expected answer / observation" test-case files.
//!
//! File layout: blocks of non-blank lines separated by blank lines. Inside a
//! block, lines are taken in pairs `(expected, observation)`; a trailing
//! unpaired line is an observation with no expected answer. So both
//!
//! ```text
//! C V C
//! b a b
//!
//! V V
//! a a
//! ```
//!
//! and a file of bare observation lines separated by blank lines are valid.

use crate::algorithms::forward::ForwardScorer;
use crate::algorithms::viterbi::ViterbiDecoder;
use crate::model::{ProbabilityModel, State, Symbol};
use crate::numeric::Domain;
use crate::observation::Observation;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One entry of a test-case file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    /// Expected answer tokens, when the file provides one.
    pub expected: Option<Vec<String>>,
    pub observation: Observation,
}

/// Parse a test-case file.
pub fn parse_cases(text: &str) -> Vec<TestCase> {
    let mut cases = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in text.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }
        for pair in block.chunks(2) {
            cases.push(match pair {
                [expected, observation] => TestCase {
                    expected: Some(tokens(expected)),
                    observation: Observation::tokenize(observation),
                },
                [observation] => TestCase {
                    expected: None,
                    observation: Observation::tokenize(observation),
                },
                _ => unreachable!("chunks(2) yields one or two lines"),
            });
        }
        block.clear();
    }
    cases
}

fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Outcome of decoding one case.
#[derive(Clone, Debug, PartialEq)]
pub struct ViterbiReport {
    pub expected: Option<Vec<String>>,
    pub emissions: Vec<Symbol>,
    pub decoded: Vec<State>,
    pub probability: f64,
}

impl ViterbiReport {
    /// `None` when the case carried no expected answer.
    pub fn matches(&self) -> Option<bool> {
        self.expected.as_ref().map(|e| *e == self.decoded)
    }
}

/// Outcome of scoring one case.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardReport {
    pub expected: Option<Vec<String>>,
    pub emissions: Vec<Symbol>,
    pub total_probability: f64,
    pub log_probability: f64,
    /// Per-step argmax of the forward matrix (filtering, not decoding).
    pub filtered_states: Vec<State>,
}

/// Decode every case. Output order follows input order.
pub fn run_viterbi_cases(
    model: &ProbabilityModel,
    cases: &[TestCase],
    domain: Domain,
) -> Vec<ViterbiReport> {
    let decoder = ViterbiDecoder::new(model).with_domain(domain);
    let run = |case: &TestCase| {
        let path = decoder.viterbi(case.observation.emissions());
        ViterbiReport {
            expected: case.expected.clone(),
            emissions: case.observation.emissions().to_vec(),
            probability: path.probability(),
            decoded: path.into_states(),
        }
    };
    #[cfg(feature = "parallel")]
    let reports = cases.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let reports = cases.iter().map(run).collect();
    reports
}

/// Score every case. Output order follows input order.
pub fn run_forward_cases(
    model: &ProbabilityModel,
    cases: &[TestCase],
    domain: Domain,
) -> Vec<ForwardReport> {
    let scorer = ForwardScorer::new(model).with_domain(domain);
    let run = |case: &TestCase| {
        let matrix = scorer.forward(case.observation.emissions());
        ForwardReport {
            expected: case.expected.clone(),
            emissions: case.observation.emissions().to_vec(),
            total_probability: matrix.total_probability(),
            log_probability: matrix.log_total(),
            filtered_states: matrix
                .filtered_states()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    };
    #[cfg(feature = "parallel")]
    let reports = cases.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let reports = cases.iter().map(run).collect();
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelBuilder;

    #[test]
    fn pairs_inside_blocks() {
        let text = "C V\nb a\n\nV\na\n";
        let cases = parse_cases(text);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].expected, Some(vec!["C".into(), "V".into()]));
        assert_eq!(cases[0].observation.emissions(), ["b", "a"]);
        assert_eq!(cases[1].observation.emissions(), ["a"]);
    }

    #[test]
    fn lone_lines_are_observations() {
        let text = "\n\nthe dog\n\n\nruns far away\n";
        let cases = parse_cases(text);
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.expected.is_none()));
        assert_eq!(cases[1].observation.len(), 3);
    }

    #[test]
    fn long_block_is_read_pairwise() {
        let cases = parse_cases("A\nx\nB\ny\nz");
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[1].expected, Some(vec!["B".into()]));
        assert_eq!(cases[2].expected, None);
        assert_eq!(cases[2].observation.emissions(), ["z"]);
    }

    #[test]
    fn empty_file_has_no_cases() {
        assert!(parse_cases("").is_empty());
        assert!(parse_cases("\n \n").is_empty());
    }

    #[test]
    fn reports_keep_input_order() {
        let m = ModelBuilder::new()
            .transition("#", "A", 0.5)
            .transition("#", "B", 0.5)
            .transition("A", "A", 1.0)
            .transition("B", "B", 1.0)
            .emission("A", "x", 1.0)
            .emission("B", "y", 1.0)
            .build()
            .unwrap();
        let cases = parse_cases("A A\nx x\n\nB B\ny y\n\nA\ny\n");
        let reports = run_viterbi_cases(&m, &cases, Domain::Probability);
        assert_eq!(reports[0].decoded, ["A", "A"]);
        assert_eq!(reports[1].decoded, ["B", "B"]);
        assert_eq!(reports[0].matches(), Some(true));
        assert_eq!(reports[2].matches(), Some(false));

        let scored = run_forward_cases(&m, &cases, Domain::Log);
        assert!((scored[0].total_probability - 0.5).abs() < 1e-12);
        assert_eq!(scored[1].filtered_states, ["B", "B"]);
        assert!((scored[2].total_probability - 0.5).abs() < 1e-12);
        assert_eq!(scored[2].filtered_states, ["B"]);
    }
}
