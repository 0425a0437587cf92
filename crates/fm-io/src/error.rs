use std::path::PathBuf;

use fm_engine::EngineError;
use fm_matrix::MatrixError;
use thiserror::Error;

/// Problems with the contents of an input file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unexpected end of input at token {index}: expected {expected}")]
    UnexpectedEnd { index: usize, expected: String },
    #[error("token {index} is not an integer: {token:?}")]
    InvalidToken { index: usize, token: String },
    #[error("token {index} is not a valid dimension: {token:?}")]
    InvalidDimension { index: usize, token: String },
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, RunError>;
