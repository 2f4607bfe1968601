use thiserror::Error;

/// Errors raised by the search core for caller mistakes.
///
/// Running out of frontier is not an error: it is reported through
/// `SearchOutcome::NoPath` or an empty route.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("malformed graph: {0}")]
    MalformedGraph(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
