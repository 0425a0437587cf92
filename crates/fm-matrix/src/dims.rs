use std::fmt;

use crate::matrix::Matrix;

/// The shape of a matrix: row and column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dims {
    pub rows: usize,
    pub columns: usize,
}

impl Dims {
    pub fn new(rows: usize, columns: usize) -> Self {
        Dims { rows, columns }
    }

    /// Total number of elements (rows * columns).
    pub fn numel(&self) -> usize {
        self.rows * self.columns
    }

    /// Total number of elements, or `None` if it does not fit in `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        self.rows.checked_mul(self.columns)
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Whether `self @ other` is defined: `self.columns == other.rows`.
    pub fn can_multiply(&self, other: &Dims) -> bool {
        self.columns == other.rows
    }

    /// Shape of `self @ other`, or `None` if the operands are not conformable.
    pub fn product(&self, other: &Dims) -> Option<Dims> {
        if self.can_multiply(other) {
            Some(Dims::new(self.rows, other.columns))
        } else {
            None
        }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

impl From<(usize, usize)> for Dims {
    fn from((rows, columns): (usize, usize)) -> Self {
        Dims::new(rows, columns)
    }
}

/// Conformability check: `a.columns == b.rows`.
pub fn can_multiply(a: &Matrix, b: &Matrix) -> bool {
    a.dims().can_multiply(&b.dims())
}
