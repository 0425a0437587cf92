use std::fmt;

use crate::dims::Dims;
use crate::error::{MatrixError, Result};

/// Element type stored in a [`Matrix`].
pub type Element = i64;

/// A dense, row-major integer matrix.
///
/// The only place a `(row, column)` pair is turned into a flat offset is the
/// private `offset` accessor. Workers that need to write into a shared output
/// obtain disjoint mutable views through [`Matrix::rows_mut`] or
/// [`Matrix::cells_mut`] instead of computing offsets themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    elements: Vec<Element>,
}

impl Matrix {
    /// Create a matrix from row-major elements.
    ///
    /// # Errors
    /// Returns [`MatrixError::TooLarge`] if `rows * columns` overflows `usize`
    /// and [`MatrixError::DataLength`] if `elements.len() != rows * columns`.
    pub fn new(rows: usize, columns: usize, elements: Vec<Element>) -> Result<Self> {
        let expected = Dims::new(rows, columns)
            .checked_numel()
            .ok_or(MatrixError::TooLarge { rows, columns })?;
        if elements.len() != expected {
            return Err(MatrixError::DataLength {
                rows,
                columns,
                len: elements.len(),
                expected,
            });
        }
        Ok(Matrix {
            rows,
            columns,
            elements,
        })
    }

    /// Create a zero-filled matrix.
    ///
    /// # Panics
    /// Panics if `rows * columns` overflows `usize`; see [`Matrix::try_zeros`].
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Matrix::try_zeros(rows, columns).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Create a zero-filled matrix.
    ///
    /// # Errors
    /// Returns [`MatrixError::TooLarge`] if `rows * columns` overflows `usize`.
    pub fn try_zeros(rows: usize, columns: usize) -> Result<Self> {
        let n = Dims::new(rows, columns)
            .checked_numel()
            .ok_or(MatrixError::TooLarge { rows, columns })?;
        Ok(Matrix {
            rows,
            columns,
            elements: vec![0; n],
        })
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Build a matrix from nested rows.
    ///
    /// An empty outer vector yields a `0x0` matrix.
    ///
    /// # Errors
    /// Returns [`MatrixError::RaggedRows`] if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();
        let mut elements = Vec::with_capacity(n_rows * columns);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: columns,
                    got: row.len(),
                });
            }
            elements.extend(row);
        }
        Matrix::new(n_rows, columns, elements)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.rows, self.columns)
    }

    /// True if the matrix holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Row-major element buffer.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Consumes the matrix, returning its row-major element buffer.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Returns element `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= rows()` or `j >= columns()`.
    pub fn get(&self, i: usize, j: usize) -> Element {
        self.elements[self.offset(i, j)]
    }

    /// Overwrites element `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= rows()` or `j >= columns()`.
    pub fn set(&mut self, i: usize, j: usize, value: Element) {
        let offset = self.offset(i, j);
        self.elements[offset] = value;
    }

    /// Returns row `i` as a slice.
    ///
    /// # Panics
    /// Panics if `i >= rows()`.
    pub fn row(&self, i: usize) -> &[Element] {
        assert!(i < self.rows, "row {} out of range for {}", i, self.dims());
        let start = i * self.columns;
        &self.elements[start..start + self.columns]
    }

    /// Splits the buffer into one exclusive slice per row, paired with the
    /// row index. Yields nothing when the matrix is empty.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [Element])> + '_ {
        // chunks_mut(0) panics; an empty buffer yields no chunks for any size.
        let chunk = self.columns.max(1);
        self.elements.chunks_mut(chunk).enumerate()
    }

    /// Splits the buffer into one exclusive reference per cell, paired with
    /// its `(row, column)` position in row-major order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Element)> + '_ {
        let columns = self.columns;
        self.elements
            .iter_mut()
            .enumerate()
            .map(move |(idx, value)| ((idx / columns, idx % columns), value))
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.columns,
            "index ({}, {}) out of range for {}",
            i,
            j,
            self.dims()
        );
        i * self.columns + j
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for value in self.row(i) {
                write!(f, "{:5} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
