//! Line-based loading of `<basename>.trans` and `<basename>.emit`.
//!
//! Each non-blank line is three whitespace-separated fields:
//! - transitions: `source destination probability`
//! - emissions:   `state symbol probability`
//!
//! There is no header row. A later record for the same key overwrites an
//! earlier one.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{HmmError, Result};
use crate::model::{EmissionTable, ProbabilityModel, StateOrder, TransitionTable};

/// Suffix of the transition source.
pub const TRANSITIONS_SUFFIX: &str = "trans";
/// Suffix of the emission source.
pub const EMISSIONS_SUFFIX: &str = "emit";

/// What to do with a line that is not a valid triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort loading with [`HmmError::MalformedRecord`].
    #[default]
    FailFast,
    /// Drop the line and emit a `warn` event.
    Skip,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LoadOptions {
    pub malformed: MalformedPolicy,
}

impl LoadOptions {
    pub fn with_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }
}

/// A parsed `key key probability` line.
#[derive(Debug, Clone, PartialEq)]
struct Record {
    key: String,
    sub: String,
    probability: f64,
}

/// Load a model with default options (fail fast on malformed lines).
pub fn load(basename: impl AsRef<Path>) -> Result<ProbabilityModel> {
    load_with(basename, LoadOptions::default())
}

/// Load `<basename>.trans` and `<basename>.emit` into a fresh model.
pub fn load_with(basename: impl AsRef<Path>, options: LoadOptions) -> Result<ProbabilityModel> {
    let trans_path = with_suffix(basename.as_ref(), TRANSITIONS_SUFFIX);
    let emit_path = with_suffix(basename.as_ref(), EMISSIONS_SUFFIX);

    let trans_file = open(&trans_path)?;
    let emit_file = open(&emit_path)?;

    let (transitions, states) = read_transitions(trans_file, &trans_path, options)?;
    let emissions = read_emissions(emit_file, &emit_path, options)?;

    tracing::debug!(
        basename = %basename.as_ref().display(),
        states = states.len(),
        sources = transitions.len(),
        emitters = emissions.len(),
        "loaded model"
    );
    Ok(ProbabilityModel::from_parts(transitions, emissions, states))
}

/// Parse a transition source from any reader.
///
/// `origin` only labels errors and log events.
pub fn read_transitions<R: Read>(
    reader: R,
    origin: &Path,
    options: LoadOptions,
) -> Result<(TransitionTable, Vec<String>)> {
    let mut table = TransitionTable::new();
    let mut order = StateOrder::default();
    for record in records(reader, origin, options)? {
        order.observe(&record.key, &record.sub);
        table
            .entry(record.key)
            .or_default()
            .insert(record.sub, record.probability);
    }
    Ok((table, order.into_vec()))
}

/// Parse an emission source from any reader.
pub fn read_emissions<R: Read>(
    reader: R,
    origin: &Path,
    options: LoadOptions,
) -> Result<EmissionTable> {
    let mut table = EmissionTable::new();
    for record in records(reader, origin, options)? {
        table
            .entry(record.key)
            .or_default()
            .insert(record.sub, record.probability);
    }
    Ok(table)
}

fn with_suffix(basename: &Path, suffix: &str) -> PathBuf {
    let mut name = basename.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn open(path: &Path) -> Result<fs::File> {
    fs::File::open(path).map_err(|source| HmmError::MissingResource {
        path: path.to_owned(),
        source,
    })
}

fn records<R: Read>(reader: R, origin: &Path, options: LoadOptions) -> Result<Vec<Record>> {
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let bytes = line.map_err(|source| HmmError::MissingResource {
            path: origin.to_owned(),
            source,
        })?;
        let parsed = match String::from_utf8(bytes) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse_record(&line),
            Err(_) => Err("line is not valid UTF-8".to_owned()),
        };
        match parsed {
            Ok(record) => out.push(record),
            Err(reason) => match options.malformed {
                MalformedPolicy::FailFast => {
                    return Err(HmmError::MalformedRecord {
                        path: origin.to_owned(),
                        line: idx + 1,
                        reason,
                    })
                }
                MalformedPolicy::Skip => {
                    tracing::warn!(
                        path = %origin.display(),
                        line = idx + 1,
                        %reason,
                        "skipping malformed record"
                    );
                }
            },
        }
    }
    Ok(out)
}

fn parse_record(line: &str) -> std::result::Result<Record, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    }
    let probability: f64 = fields[2]
        .parse()
        .map_err(|_| format!("'{}' is not a number", fields[2]))?;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(format!("probability {probability} outside [0, 1]"));
    }
    Ok(Record {
        key: fields[0].to_owned(),
        sub: fields[1].to_owned(),
        probability,
    })
}
