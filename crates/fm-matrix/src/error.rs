use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("data length {len} does not match {rows}x{columns} (expected {expected})")]
    DataLength {
        rows: usize,
        columns: usize,
        len: usize,
        expected: usize,
    },
    #[error("{rows}x{columns} matrix has more elements than fit in memory")]
    TooLarge { rows: usize, columns: usize },
    #[error("ragged rows: row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
