//! Failures of the noun extraction pipeline
//!
//! None of these are recovered from: a run that hits any of them produces no
//! output, since partial noun counts cannot be trusted.

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A source description is missing a field or has an unusable one
    #[error("invalid description of source {source_name:?}: {reason}")]
    Configuration {
        source_name: Box<str>,
        reason: Box<str>,
    },

    /// A source's data file could not be opened
    #[error("failed to open data file {} of source {source_name:?}", .path.display())]
    OpenInput {
        source_name: Box<str>,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source's data file could not be read to the end
    #[error("failed to read data file of source {source_name:?}")]
    ReadInput {
        source_name: Box<str>,
        #[source]
        source: csv_async::Error,
    },

    /// A row of a source's data file is not a well-formed record
    #[error("failed to decode a record from source {source_name:?}")]
    Decode {
        source_name: Box<str>,
        #[source]
        source: csv_async::Error,
    },

    /// A record passed the source's filter but does not have the structure
    /// that the filter is supposed to guarantee
    #[error("record {ngram:?} was accepted by source {source_name:?} but cannot be decomposed: {reason}")]
    MatchInvariantViolation {
        source_name: Box<str>,
        ngram: Box<str>,
        reason: &'static str,
    },
}
//
impl Error {
    /// Build a configuration error
    pub fn configuration(source_name: &str, reason: impl Into<Box<str>>) -> Self {
        Self::Configuration {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Classify a failure of the TSV decoder
    pub fn from_tsv(source_name: &str, error: csv_async::Error) -> Self {
        let source_name = source_name.into();
        if error.is_io_error() {
            Self::ReadInput {
                source_name,
                source: error,
            }
        } else {
            Self::Decode {
                source_name,
                source: error,
            }
        }
    }
}
