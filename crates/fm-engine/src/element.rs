use std::fmt;
use std::sync::Arc;

use fm_matrix::{Element, Matrix};
use tracing::debug;

use crate::error::Result;
use crate::fork_join::{self, WorkerLimit};
use crate::kernel;
use crate::observer::WorkObserver;
use crate::strategy::{Multiplication, MultiplyStrategy, StrategyTag};

/// Element decomposition: one worker per output cell.
///
/// Work items are indexed densely as `i * columns + j`. With
/// [`WorkerLimit::Unbounded`] this launches `rows * columns` OS threads,
/// which grows quickly; use a bounded limit for large outputs.
#[derive(Clone, Default)]
pub struct ElementStrategy {
    limit: WorkerLimit,
    observer: Option<Arc<dyn WorkObserver>>,
}

impl ElementStrategy {
    pub fn new(limit: WorkerLimit) -> Self {
        ElementStrategy {
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

impl fmt::Debug for ElementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementStrategy")
            .field("limit", &self.limit)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl MultiplyStrategy for ElementStrategy {
    fn tag(&self) -> StrategyTag {
        StrategyTag::Element
    }

    fn name(&self) -> &str {
        "element"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Multiplication> {
        let mut c = kernel::allocate_product(a, b)?;
        debug!(a = %a.dims(), b = %b.dims(), "element strategy allocated {}", c.dims());

        let observer = self.observer.as_deref();
        let cells: Vec<((usize, usize), &mut Element)> = c.cells_mut().collect();
        let workers = fork_join::run(self.name(), cells, self.limit, |worker, ((i, j), cell)| {
            *cell = kernel::dot(a, b, i, j);
            if let Some(observer) = observer {
                observer.on_write(worker, i, j);
            }
        })?;

        Ok(Multiplication { matrix: c, workers })
    }
}
