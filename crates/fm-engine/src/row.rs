use std::fmt;
use std::sync::Arc;

use fm_matrix::{Element, Matrix};
use tracing::debug;

use crate::error::Result;
use crate::fork_join::{self, WorkerLimit};
use crate::kernel;
use crate::observer::WorkObserver;
use crate::strategy::{Multiplication, MultiplyStrategy, StrategyTag};

/// Row decomposition: one worker per output row.
///
/// Each worker owns an exclusive `&mut` slice over its row of C and fills
/// every column of it. Rows are split from C's buffer before any worker
/// starts, so no two workers can address the same cell.
#[derive(Clone, Default)]
pub struct RowStrategy {
    limit: WorkerLimit,
    observer: Option<Arc<dyn WorkObserver>>,
}

impl RowStrategy {
    pub fn new(limit: WorkerLimit) -> Self {
        RowStrategy {
            limit,
            observer: None,
        }
    }

    /// Attach an observer notified of every cell written.
    pub fn with_observer(mut self, observer: Arc<dyn WorkObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn limit(&self) -> WorkerLimit {
        self.limit
    }
}

impl fmt::Debug for RowStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStrategy")
            .field("limit", &self.limit)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl MultiplyStrategy for RowStrategy {
    fn tag(&self) -> StrategyTag {
        StrategyTag::Row
    }

    fn name(&self) -> &str {
        "row"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Multiplication> {
        let mut c = kernel::allocate_product(a, b)?;
        debug!(a = %a.dims(), b = %b.dims(), "row strategy allocated {}", c.dims());

        let observer = self.observer.as_deref();
        let rows: Vec<(usize, &mut [Element])> = c.rows_mut().collect();
        let workers = fork_join::run(self.name(), rows, self.limit, |worker, (i, row)| {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = kernel::dot(a, b, i, j);
                if let Some(observer) = observer {
                    observer.on_write(worker, i, j);
                }
            }
        })?;

        Ok(Multiplication { matrix: c, workers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::collections::HashMap;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        writes: Mutex<Vec<(usize, usize, usize)>>,
    }

    impl WorkObserver for Recorder {
        fn on_write(&self, worker: usize, row: usize, column: usize) {
            self.writes.lock().unwrap().push((worker, row, column));
        }
    }

    fn m(rows: Vec<Vec<Element>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_row_basic() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = m(vec![vec![5, 6], vec![7, 8]]);
        let out = RowStrategy::default().multiply(&a, &b).unwrap();
        assert_eq!(out.matrix.elements(), &[19, 22, 43, 50]);
        assert_eq!(out.workers, 2);
    }

    #[test]
    fn test_row_vector_dot() {
        let a = m(vec![vec![1, 2, 3]]);
        let b = m(vec![vec![1], vec![1], vec![1]]);
        let out = RowStrategy::default().multiply(&a, &b).unwrap();
        assert_eq!(out.matrix, m(vec![vec![6]]));
        assert_eq!(out.workers, 1);
    }

    #[test]
    fn test_row_not_conformable() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let err = RowStrategy::default().multiply(&a, &b).unwrap_err();
        assert!(matches!(err, EngineError::NotConformable { .. }));
    }

    #[test]
    fn test_row_too_large_launches_nothing() {
        let recorder = Arc::new(Recorder::default());
        let huge = 1usize << (usize::BITS / 2 + 1);
        let err = RowStrategy::default()
            .with_observer(recorder.clone())
            .multiply(&Matrix::zeros(huge, 0), &Matrix::zeros(0, huge))
            .unwrap_err();
        assert!(matches!(err, EngineError::TooLarge { dims } if dims.rows == huge));
        assert!(recorder.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_row_zero_rows_launches_nothing() {
        let recorder = Arc::new(Recorder::default());
        let strategy = RowStrategy::default().with_observer(recorder.clone());
        let out = strategy
            .multiply(&Matrix::zeros(0, 3), &Matrix::zeros(3, 4))
            .unwrap();
        assert_eq!(out.workers, 0);
        assert_eq!(out.matrix.rows(), 0);
        assert_eq!(out.matrix.columns(), 4);
        assert!(recorder.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_row_zero_columns_launches_nothing() {
        let out = RowStrategy::default()
            .multiply(&Matrix::zeros(3, 2), &Matrix::zeros(2, 0))
            .unwrap();
        assert_eq!(out.workers, 0);
        assert!(out.matrix.is_empty());
    }

    #[test]
    fn test_row_each_worker_owns_one_row() {
        let recorder = Arc::new(Recorder::default());
        let a = Matrix::new(4, 3, (0..12).collect()).unwrap();
        let b = Matrix::new(3, 5, (0..15).collect()).unwrap();
        RowStrategy::default()
            .with_observer(recorder.clone())
            .multiply(&a, &b)
            .unwrap();

        let writes = recorder.writes.lock().unwrap();
        assert_eq!(writes.len(), 20);
        let mut owner: HashMap<(usize, usize), usize> = HashMap::new();
        for &(worker, i, j) in writes.iter() {
            assert_eq!(worker, i, "worker {} wrote outside its row", worker);
            assert!(owner.insert((i, j), worker).is_none(), "cell ({}, {}) written twice", i, j);
        }
    }

    #[test]
    fn test_row_bounded_matches_unbounded() {
        let a = Matrix::new(7, 3, (0..21).collect()).unwrap();
        let b = Matrix::new(3, 2, (0..6).collect()).unwrap();
        let unbounded = RowStrategy::default().multiply(&a, &b).unwrap();
        let limit = WorkerLimit::Bounded(NonZeroUsize::new(3).unwrap());
        let bounded = RowStrategy::new(limit).multiply(&a, &b).unwrap();
        assert_eq!(bounded.matrix, unbounded.matrix);
        assert_eq!(unbounded.workers, 7);
        assert_eq!(bounded.workers, 3);
    }
}
