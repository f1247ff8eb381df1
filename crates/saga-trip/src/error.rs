use std::path::PathBuf;

use saga_engine::{Halted, SagaError};
use thiserror::Error;

use crate::booking::{Booking, BookingError, TripState};

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to read scenario '{path}'")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario '{path}'")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to open journal '{path}'")]
    JournalOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to journal '{path}'")]
    JournalAppend {
        path: PathBuf,
        #[source]
        source: BookingError,
    },

    #[error("corrupt entry on line {line} of journal '{path}'")]
    JournalParse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid trip saga configuration")]
    Configuration(#[from] SagaError<TripState, BookingError>),

    #[error("trip did not reach a final state")]
    Halted(#[from] Halted<Booking, BookingError>),
}

pub(crate) type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::CliError;

    #[test]
    fn journal_parse_error_includes_path_and_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let err = CliError::JournalParse {
            path: PathBuf::from("/tmp/trip.jsonl"),
            line: 3,
            source,
        };

        let msg = err.to_string();

        assert!(msg.contains("/tmp/trip.jsonl"));
        assert!(msg.contains("line 3"));
    }

    #[test]
    fn scenario_read_error_keeps_io_source() {
        let err = CliError::ScenarioRead {
            path: PathBuf::from("scenario.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };

        let source = std::error::Error::source(&err).expect("has source");

        assert_eq!(source.to_string(), "missing");
    }
}
