use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hmm_dp::driver::{parse_cases, run_forward_cases, run_viterbi_cases};
use hmm_dp::{load_with, Domain, LoadOptions, MalformedPolicy, ProbabilityModel, Sampler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Level;

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("hmm: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(options.log_level)
        .with_writer(std::io::stderr)
        .init();

    let stdout = io::stdout();
    if let Err(err) = run(&options, &mut stdout.lock()) {
        eprintln!("hmm: {err}");
        std::process::exit(1);
    }
}

fn run<W: Write>(options: &Options, out: &mut W) -> Result<(), String> {
    let load_options = LoadOptions::default().with_malformed(options.malformed);
    let model = load_with(&options.basename, load_options).map_err(|e| e.to_string())?;

    if options.generate > 0 {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let observation = Sampler::new(&model)
            .generate(options.generate, &mut rng)
            .map_err(|e| e.to_string())?;
        writeln!(out, "Generated text:").map_err(write_error)?;
        writeln!(out, "{observation}").map_err(write_error)?;
    }

    if let Some(path) = &options.forward {
        run_forward(&model, path, options.domain, out)?;
    }
    if let Some(path) = &options.viterbi {
        run_viterbi(&model, path, options.domain, out)?;
    }
    Ok(())
}

fn write_error(err: io::Error) -> String {
    format!("cannot write output: {err}")
}

fn read_cases(path: &Path) -> Result<Vec<hmm_dp::driver::TestCase>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    Ok(parse_cases(&text))
}

fn run_forward<W: Write>(
    model: &ProbabilityModel,
    path: &Path,
    domain: Domain,
    out: &mut W,
) -> Result<(), String> {
    let cases = read_cases(path)?;
    writeln!(out, "Testing the forward algorithm:").map_err(write_error)?;
    for report in run_forward_cases(model, &cases, domain) {
        if let Some(expected) = &report.expected {
            writeln!(out, "Expected: {}", expected.join(" ")).map_err(write_error)?;
        }
        writeln!(
            out,
            "Actual: {:e} (log {:.6})",
            report.total_probability, report.log_probability
        )
        .map_err(write_error)?;
        writeln!(out, "Filtered: {}", report.filtered_states.join(" ")).map_err(write_error)?;
        writeln!(out, "{}\n", report.emissions.join(" ")).map_err(write_error)?;
    }
    Ok(())
}

fn run_viterbi<W: Write>(
    model: &ProbabilityModel,
    path: &Path,
    domain: Domain,
    out: &mut W,
) -> Result<(), String> {
    let cases = read_cases(path)?;
    writeln!(out, "Testing the viterbi algorithm:").map_err(write_error)?;
    let reports = run_viterbi_cases(model, &cases, domain);
    let mut checked = 0usize;
    let mut passed = 0usize;
    for report in &reports {
        if let Some(expected) = &report.expected {
            writeln!(out, "Expected: {}", expected.join(" ")).map_err(write_error)?;
        }
        writeln!(out, "Actual: {}", report.decoded.join(" ")).map_err(write_error)?;
        writeln!(out, "{}\n", report.emissions.join(" ")).map_err(write_error)?;
        if let Some(ok) = report.matches() {
            checked += 1;
            passed += usize::from(ok);
        }
    }
    if checked > 0 {
        writeln!(out, "Matched {passed}/{checked} expected paths").map_err(write_error)?;
    }
    Ok(())
}

struct Options {
    basename: PathBuf,
    generate: usize,
    seed: Option<u64>,
    forward: Option<PathBuf>,
    viterbi: Option<PathBuf>,
    domain: Domain,
    malformed: MalformedPolicy,
    log_level: Level,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut basename = None;
        let mut generate = 20usize;
        let mut seed = None;
        let mut forward = None;
        let mut viterbi = None;
        let mut domain = Domain::Probability;
        let mut malformed = MalformedPolicy::FailFast;
        let mut log_level = Level::WARN;

        while let Some(arg) = args.next() {
            let arg: String = arg.into();
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                match inline.clone() {
                    Some(v) => Ok(v),
                    None => args
                        .next()
                        .map(Into::into)
                        .ok_or_else(|| format!("missing value after {name}")),
                }
            };
            match flag.as_str() {
                "--help" | "-h" => {
                    Options::print_help();
                    std::process::exit(0);
                }
                "--basename" => basename = Some(PathBuf::from(value("--basename")?)),
                "--generate" => {
                    generate = value("--generate")?
                        .parse::<usize>()
                        .map_err(|_| "generate length must be a non-negative integer".to_string())?
                }
                "--seed" => {
                    seed = Some(
                        value("--seed")?
                            .parse::<u64>()
                            .map_err(|_| "seed must be an unsigned integer".to_string())?,
                    )
                }
                "--forward" => forward = Some(PathBuf::from(value("--forward")?)),
                "--viterbi" => viterbi = Some(PathBuf::from(value("--viterbi")?)),
                "--log-domain" => domain = Domain::Log,
                "--skip-malformed" => malformed = MalformedPolicy::Skip,
                "--verbose" | "-v" => {
                    log_level = if log_level == Level::WARN {
                        Level::DEBUG
                    } else {
                        Level::TRACE
                    }
                }
                _ => return Err(format!("unrecognized argument '{arg}'")),
            }
        }

        Ok(Self {
            basename: basename.ok_or_else(|| "--basename is required".to_string())?,
            generate,
            seed,
            forward,
            viterbi,
            domain,
            malformed,
            log_level,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: hmm --basename <BASE> [options]

Loads <BASE>.trans and <BASE>.emit, prints a sampled sequence, then runs
the forward and/or Viterbi algorithm over test-case files.

Options:
  --basename <BASE>     Model files prefix (required)
  --generate <N>        Length of the sampled sequence, 0 to skip (default: 20)
  --seed <S>            Seed for sampling (default: from entropy)
  --forward <FILE>      Score every observation in FILE
  --viterbi <FILE>      Decode every observation in FILE
  --log-domain          Accumulate in log space instead of plain probabilities
  --skip-malformed      Warn about and skip bad model lines instead of failing
  -v, --verbose         More logging on stderr (repeat for trace)
  -h, --help            Print this help message

Examples:
  cargo run --bin hmm -- --basename data/cv --viterbi data/cv_words.cases
  cargo run --bin hmm -- --basename data/cv --generate 10 --seed 7
"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn requires_basename() {
        assert!(parse(&["--generate", "3"]).is_err());
    }

    #[test]
    fn accepts_inline_and_separate_values() {
        let o = parse(&["--basename=data/x", "--seed", "9", "--log-domain", "-v"]).unwrap();
        assert_eq!(o.basename, PathBuf::from("data/x"));
        assert_eq!(o.seed, Some(9));
        assert_eq!(o.domain, Domain::Log);
        assert_eq!(o.log_level, Level::DEBUG);
        assert_eq!(o.generate, 20);
    }

    fn sample_data(file: &str) -> String {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("data")
            .join(file)
            .display()
            .to_string()
    }

    fn run_to_string(args: &[&str]) -> String {
        let options = parse(args).unwrap();
        let mut out = Vec::new();
        run(&options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn run_prints_sample_and_both_reports() {
        let base = sample_data("cv");
        let cases = sample_data("cv_words.cases");
        let args = [
            "--basename",
            base.as_str(),
            "--generate",
            "6",
            "--seed",
            "7",
            "--forward",
            cases.as_str(),
            "--viterbi",
            cases.as_str(),
        ];
        let text = run_to_string(&args);

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Generated text:"));
        let states = lines.next().unwrap().split_whitespace().count();
        let symbols = lines.next().unwrap().split_whitespace().count();
        assert_eq!((states, symbols), (6, 6));

        assert!(text.contains("Testing the forward algorithm:"));
        assert!(text.contains("Testing the viterbi algorithm:"));
        assert!(text.contains("Expected: C V C\nActual: "));
        assert_eq!(text.matches("Filtered: ").count(), 4);
        assert!(text.contains("/3 expected paths"));

        assert_eq!(text, run_to_string(&args));
    }

    #[test]
    fn run_reports_missing_model() {
        let options = parse(&["--basename", "no/such/model"]).unwrap();
        let err = run(&options, &mut Vec::new()).unwrap_err();
        assert!(err.contains("no/such/model.trans"), "{err}");
    }

    #[test]
    fn rejects_bad_numbers_and_unknown_flags() {
        assert!(parse(&["--basename", "x", "--generate", "-1"]).is_err());
        assert!(parse(&["--basename", "x", "--frobnicate"]).is_err());
        assert!(parse(&["--basename"]).is_err());
    }
}
