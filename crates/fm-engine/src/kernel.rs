// Shared pieces of the fork-join engines: output allocation and the inner product.

use fm_matrix::{Dims, Element, Matrix};

use crate::error::{EngineError, Result};

/// Shape of `a * b`.
///
/// Fails with [`EngineError::NotConformable`] if the inner dimensions differ
/// and with [`EngineError::TooLarge`] if `rows * columns` overflows `usize`.
pub(crate) fn product_dims(a: &Matrix, b: &Matrix) -> Result<Dims> {
    let dims = a.dims().product(&b.dims()).ok_or(EngineError::NotConformable {
        a: a.dims(),
        b: b.dims(),
    })?;
    match dims.checked_numel() {
        Some(_) => Ok(dims),
        None => Err(EngineError::TooLarge { dims }),
    }
}

/// Zero-filled output for `a * b`. Nothing is allocated on error.
pub(crate) fn allocate_product(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let dims = product_dims(a, b)?;
    Matrix::try_zeros(dims.rows, dims.columns).map_err(|_| EngineError::TooLarge { dims })
}

/// `sum over k of a[i, k] * b[k, j]`, with wrapping arithmetic so every
/// strategy overflows identically.
pub(crate) fn dot(a: &Matrix, b: &Matrix, i: usize, j: usize) -> Element {
    a.row(i)
        .iter()
        .enumerate()
        .fold(0, |acc: Element, (k, &x)| acc.wrapping_add(x.wrapping_mul(b.get(k, j))))
}
