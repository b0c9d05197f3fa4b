use std::{io, path::PathBuf};

use thiserror::Error;

use super::{common::ZipCode, record::RecordError, window::YearMonth};

/// [RentalError] covers everything that can go wrong while loading or
/// querying a [Dataset](super::dataset::Dataset).
#[derive(Debug, Error)]
pub enum RentalError {
    /// An input file does not exist. Fatal.
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// An input file exists but could not be read.
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input file does not hold valid rental data. `path` names the
    /// offending file.
    #[error("invalid data in {}: {source}", path.display())]
    DataFormat {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    /// A record handed over directly does not fit the observation window or
    /// its siblings. `line` in `source` is the 1-based record position.
    #[error("invalid record for zip code {zip_code}: {source}")]
    InvalidRecord {
        zip_code: ZipCode,
        #[source]
        source: RecordError,
    },

    /// No city with this exact name was loaded. Recoverable.
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    /// A city has no zip code records. Indicates a broken internal invariant.
    #[error("no zip code records for city '{0}'")]
    EmptyGroup(String),

    #[error("observation window ends ({end}) before it starts ({start})")]
    InvalidWindow { start: YearMonth, end: YearMonth },
}

impl RentalError {
    pub(crate) fn data_format(path: impl Into<PathBuf>, source: RecordError) -> Self {
        Self::DataFormat {
            path: path.into(),
            source,
        }
    }
}
