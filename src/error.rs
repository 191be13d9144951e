use thiserror::Error;

/// everything that can go wrong between a grid file and a solved grid.
/// inner layers never retry or fall back; failures surface once at the
/// outermost layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid grid file: {0}")]
    InvalidGridFile(&'static str),
    #[error("invalid solution string")]
    InvalidSolutionString,
    #[error("solution is not valid for this grid")]
    InvalidSolutionForGrid,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
