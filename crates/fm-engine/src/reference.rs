use fm_matrix::{Element, Matrix};

use crate::error::Result;
use crate::kernel;

/// Sequential triple-loop product on the calling thread.
///
/// Uses the same wrapping arithmetic as the parallel strategies, so results
/// agree even on overflow.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = kernel::allocate_product(a, b)?;
    let dims = c.dims();
    for i in 0..dims.rows {
        for j in 0..dims.columns {
            let mut sum: Element = 0;
            for k in 0..b.rows() {
                sum = sum.wrapping_add(a.get(i, k).wrapping_mul(b.get(k, j)));
            }
            c.set(i, j, sum);
        }
    }
    Ok(c)
}
