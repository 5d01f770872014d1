//! Error enum
use std::fmt;
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Custom(String),
    Serde(serde_json::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Csv(csv::Error),
    Parquet(parquet::errors::ParquetError),
    Reqwest(reqwest::Error),
    Url(url::ParseError),
    /// A document that could not be read or decoded.
    /// Counted and skipped, never fatal.
    MalformedInput {
        source: String,
        reason: String,
    },
    /// Internal invariant violation of the near-duplicate index. Fatal.
    IndexCorruption(String),
    /// Output sink failure. Fatal.
    Sink(std::io::Error),
}

impl Error {
    /// Per-document errors that should be counted and skipped rather than abort a run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MalformedInput { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Custom(s) => write!(f, "{s}"),
            Error::Serde(e) => write!(f, "serialization error: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Error::Csv(e) => write!(f, "csv error: {e}"),
            Error::Parquet(e) => write!(f, "parquet error: {e}"),
            Error::Reqwest(e) => write!(f, "http error: {e}"),
            Error::Url(e) => write!(f, "url error: {e}"),
            Error::MalformedInput { source, reason } => {
                write!(f, "malformed input {source}: {reason}")
            }
            Error::IndexCorruption(s) => write!(f, "index corruption: {s}"),
            Error::Sink(e) => write!(f, "could not write to output: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Error {
        Error::Custom(format!("invalid utf-8: {e}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<parquet::errors::ParquetError> for Error {
    fn from(e: parquet::errors::ParquetError) -> Error {
        Error::Parquet(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}
