use std::time::Instant;

use fm_matrix::Matrix;
use tracing::{debug, error, info};

use crate::error::{EngineError, Result};
use crate::fork_join::WorkerLimit;
use crate::kernel;
use crate::report::{ReportSink, StrategyReport};
use crate::strategy::{MultiplyStrategy, StrategyTag};

/// Runs a sequence of strategies over the same operands, one at a time.
///
/// Each strategy goes through allocate, launch, join and report before the
/// next one starts, so two generations of workers never overlap. The timer
/// brackets only the strategy's `multiply` call.
#[derive(Debug, Default)]
pub struct Pipeline {
    strategies: Vec<Box<dyn MultiplyStrategy>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Row strategy followed by element strategy, both under `limit`.
    pub fn standard(limit: WorkerLimit) -> Self {
        Self::from_tags(&StrategyTag::ALL, limit)
    }

    /// One strategy per tag, in the given order.
    pub fn from_tags(tags: &[StrategyTag], limit: WorkerLimit) -> Self {
        tags.iter()
            .fold(Self::new(), |pipeline, tag| pipeline.with(tag.build(limit)))
    }

    /// Add a strategy to the end of the pipeline. Returns self for builder-style usage.
    pub fn with(mut self, strategy: Box<dyn MultiplyStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn tags(&self) -> Vec<StrategyTag> {
        self.strategies.iter().map(|s| s.tag()).collect()
    }

    /// Multiply `a` by `b` with every strategy and hand each report to `sink`.
    ///
    /// Fails before allocating anything if `a` and `b` are not conformable
    /// or the product would not fit in memory.
    /// A failing strategy stops the run; earlier reports have already been
    /// delivered, later strategies never start.
    pub fn run<S>(&self, a: &Matrix, b: &Matrix, sink: &mut S) -> std::result::Result<(), S::Error>
    where
        S: ReportSink + ?Sized,
        S::Error: From<EngineError>,
    {
        if let Err(err) = kernel::product_dims(a, b) {
            error!(a = %a.dims(), b = %b.dims(), error = %err, "refusing to multiply");
            return Err(err.into());
        }

        for strategy in &self.strategies {
            let report = Self::execute(strategy.as_ref(), a, b)?;
            debug!(strategy = %report.strategy, "handing report to sink");
            sink.report(report)?;
        }
        Ok(())
    }

    /// Time one strategy from allocation through join.
    pub fn execute(strategy: &dyn MultiplyStrategy, a: &Matrix, b: &Matrix) -> Result<StrategyReport> {
        let start = Instant::now();
        let product = strategy.multiply(a, b)?;
        let elapsed = start.elapsed();

        info!(
            strategy = strategy.name(),
            workers = product.workers,
            seconds = elapsed.as_secs_f64(),
            "multiplication finished"
        );

        Ok(StrategyReport {
            strategy: strategy.tag(),
            matrix: product.matrix,
            elapsed,
            workers: product.workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;
    use crate::strategy::Multiplication;
    use crate::{ElementStrategy, RowStrategy};
    use fm_matrix::Element;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fails every call as if one of its workers had panicked.
    #[derive(Debug)]
    struct Failing;

    impl MultiplyStrategy for Failing {
        fn tag(&self) -> StrategyTag {
            StrategyTag::Element
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn multiply(&self, _a: &Matrix, _b: &Matrix) -> Result<Multiplication> {
            Err(EngineError::WorkerPanicked {
                strategy: self.name().to_string(),
                worker: 0,
            })
        }
    }

    /// Delegates to the row strategy and counts its calls.
    #[derive(Debug, Default)]
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl MultiplyStrategy for Counting {
        fn tag(&self) -> StrategyTag {
            StrategyTag::Row
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Multiplication> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RowStrategy::default().multiply(a, b)
        }
    }

    fn random_matrix(rng: &mut StdRng, rows: usize, columns: usize) -> Matrix {
        let elements = (0..rows * columns)
            .map(|_| rng.gen_range(-50..=50) as Element)
            .collect();
        Matrix::new(rows, columns, elements).unwrap()
    }

    #[test]
    fn test_standard_order() {
        let pipeline = Pipeline::standard(WorkerLimit::Unbounded);
        assert_eq!(pipeline.tags(), vec![StrategyTag::Row, StrategyTag::Element]);
    }

    #[test]
    fn test_run_reports_each_strategy() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
        let expected = Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap();

        let mut reports: Vec<StrategyReport> = Vec::new();
        Pipeline::standard(WorkerLimit::Unbounded)
            .run(&a, &b, &mut reports)
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].strategy, StrategyTag::Row);
        assert_eq!(reports[0].workers, 2);
        assert_eq!(reports[1].strategy, StrategyTag::Element);
        assert_eq!(reports[1].workers, 4);
        for report in &reports {
            assert_eq!(report.matrix, expected);
        }
    }

    #[test]
    fn test_run_single_column_product() {
        let a = Matrix::from_rows(vec![vec![1, 2, 3]]).unwrap();
        let b = Matrix::from_rows(vec![vec![1], vec![1], vec![1]]).unwrap();
        let mut reports: Vec<StrategyReport> = Vec::new();
        Pipeline::standard(WorkerLimit::Unbounded)
            .run(&a, &b, &mut reports)
            .unwrap();
        for report in &reports {
            assert_eq!(report.matrix.elements(), &[6]);
        }
    }

    #[test]
    fn test_run_not_conformable_reports_nothing() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let mut reports: Vec<StrategyReport> = Vec::new();
        let err = Pipeline::standard(WorkerLimit::Unbounded)
            .run(&a, &b, &mut reports)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotConformable { .. }));
        assert!(reports.is_empty());
    }

    #[test]
    fn test_run_too_large_reports_nothing() {
        let huge = 1usize << (usize::BITS / 2 + 1);
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new().with(Box::new(Counting {
            calls: calls.clone(),
        }));
        let mut reports: Vec<StrategyReport> = Vec::new();
        let err = pipeline
            .run(&Matrix::zeros(huge, 0), &Matrix::zeros(0, huge), &mut reports)
            .unwrap_err();
        assert!(matches!(err, EngineError::TooLarge { .. }));
        assert!(reports.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_run_stops_at_failing_strategy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with(Box::new(RowStrategy::default()))
            .with(Box::new(Failing))
            .with(Box::new(Counting {
                calls: calls.clone(),
            }));

        let a = Matrix::identity(2);
        let mut reports: Vec<StrategyReport> = Vec::new();
        let err = pipeline.run(&a, &a, &mut reports).unwrap_err();

        assert!(matches!(
            err,
            EngineError::WorkerPanicked { ref strategy, worker: 0 } if strategy == "failing"
        ));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].strategy, StrategyTag::Row);
        assert_eq!(reports[0].matrix, a);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "strategy after the failure ran");
    }

    #[test]
    fn test_strategies_wrap_near_element_max() {
        let a = Matrix::from_rows(vec![
            vec![Element::MAX, Element::MAX - 1, 2],
            vec![Element::MIN, 3, Element::MAX / 2],
        ])
        .unwrap();
        let b = Matrix::from_rows(vec![
            vec![Element::MAX, 1],
            vec![2, Element::MIN + 1],
            vec![Element::MAX - 7, -1],
        ])
        .unwrap();
        let expected = reference::multiply(&a, &b).unwrap();

        // MAX * MAX wraps to 1; (MAX - 1) * 2 wraps to -4; 2 * (MAX - 7) wraps to -16.
        assert_eq!(expected.get(0, 0), 1 - 4 - 16);

        let bounded = WorkerLimit::Bounded(NonZeroUsize::new(2).unwrap());
        for limit in [WorkerLimit::Unbounded, bounded] {
            let row = RowStrategy::new(limit).multiply(&a, &b).unwrap();
            let element = ElementStrategy::new(limit).multiply(&a, &b).unwrap();
            assert_eq!(row.matrix, expected, "row strategy ({})", limit);
            assert_eq!(element.matrix, expected, "element strategy ({})", limit);
        }
    }

    #[test]
    fn test_run_zero_dims() {
        let mut reports: Vec<StrategyReport> = Vec::new();
        Pipeline::standard(WorkerLimit::Unbounded)
            .run(&Matrix::zeros(0, 4), &Matrix::zeros(4, 3), &mut reports)
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.workers == 0 && r.matrix.is_empty()));
    }

    #[test]
    fn test_identity_property() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = random_matrix(&mut rng, 5, 3);
        let mut reports: Vec<StrategyReport> = Vec::new();
        let pipeline = Pipeline::standard(WorkerLimit::Unbounded);
        pipeline.run(&a, &Matrix::identity(3), &mut reports).unwrap();
        pipeline.run(&Matrix::identity(5), &a, &mut reports).unwrap();
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| r.matrix == a));
    }

    #[test]
    fn test_strategies_agree_with_reference() {
        let mut rng = StdRng::seed_from_u64(42);
        let bounded = WorkerLimit::Bounded(NonZeroUsize::new(3).unwrap());
        for _ in 0..20 {
            let m = rng.gen_range(0..7);
            let k = rng.gen_range(0..7);
            let n = rng.gen_range(0..7);
            let a = random_matrix(&mut rng, m, k);
            let b = random_matrix(&mut rng, k, n);
            let expected = reference::multiply(&a, &b).unwrap();

            for limit in [WorkerLimit::Unbounded, bounded] {
                let mut reports: Vec<StrategyReport> = Vec::new();
                Pipeline::standard(limit).run(&a, &b, &mut reports).unwrap();
                for report in reports {
                    assert_eq!(
                        report.matrix, expected,
                        "{} strategy ({}) disagrees on {}x{}x{}",
                        report.strategy, limit, m, k, n
                    );
                }
            }
        }
    }

    #[test]
    fn test_execute_times_strategy() {
        let a = Matrix::identity(3);
        let report = Pipeline::execute(StrategyTag::Element.build(WorkerLimit::Unbounded).as_ref(), &a, &a)
            .unwrap();
        assert_eq!(report.strategy, StrategyTag::Element);
        assert_eq!(report.workers, 9);
        assert!(report.elapsed_seconds() >= 0.0);
    }
}
