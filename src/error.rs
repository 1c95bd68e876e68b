//! Error taxonomy for model construction and sampling.
//!
//! The dynamic programs in [`crate::algorithms`] never fail: missing table
//! entries are absorbed as probability zero (see
//! [`crate::model::MISSING_PROBABILITY`]). Only loading, building and
//! sampling can report errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::State;

/// Errors raised while building or sampling from a model.
#[derive(Debug, Error)]
pub enum HmmError {
    /// A load source could not be opened or read.
    #[error("cannot read '{}': {source}", .path.display())]
    MissingResource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A load-source line is not a `key key probability` triple.
    #[error("{}:{line}: malformed record: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        reason: String,
    },

    /// A programmatically supplied probability is non-finite or outside [0, 1].
    #[error("invalid probability {value} for '{from}' -> '{to}'")]
    InvalidProbability { from: String, to: String, value: f64 },

    /// The sampler reached a state without outgoing transitions.
    #[error("state '{0}' has no outgoing transitions")]
    UnknownState(State),

    /// The sampler reached a state without emission entries.
    #[error("state '{0}' has no emission distribution")]
    UnknownEmission(State),

    /// A distribution exists but cannot be sampled from (e.g. all weights zero).
    #[error("cannot sample from distribution of '{owner}': {reason}")]
    DegenerateDistribution { owner: State, reason: String },
}

pub type Result<T> = std::result::Result<T, HmmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_reports_location() {
        let err = HmmError::MalformedRecord {
            path: PathBuf::from("two_state.trans"),
            line: 3,
            reason: "expected 3 fields, found 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "two_state.trans:3: malformed record: expected 3 fields, found 2"
        );
    }

    #[test]
    fn missing_resource_keeps_io_source() {
        let err = HmmError::MissingResource {
            path: PathBuf::from("nowhere.emit"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("cannot read 'nowhere.emit'"));
    }
}
