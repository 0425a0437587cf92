use std::time::Duration;

use fm_matrix::Matrix;

use crate::error::EngineError;
use crate::strategy::StrategyTag;

/// The finished product of one strategy run and how long it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReport {
    pub strategy: StrategyTag,
    pub matrix: Matrix,
    /// Time from allocating C until every worker joined.
    pub elapsed: Duration,
    /// Number of OS threads the fork-join phase launched.
    pub workers: usize,
}

impl StrategyReport {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Destination for finished strategy reports.
///
/// The pipeline moves each report into the sink once its workers have
/// joined; a sink never sees a partially computed matrix.
pub trait ReportSink {
    type Error;

    fn report(&mut self, report: StrategyReport) -> Result<(), Self::Error>;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    type Error = S::Error;

    fn report(&mut self, report: StrategyReport) -> Result<(), Self::Error> {
        (**self).report(report)
    }
}

/// `None` discards reports.
impl<S: ReportSink> ReportSink for Option<S> {
    type Error = S::Error;

    fn report(&mut self, report: StrategyReport) -> Result<(), Self::Error> {
        match self {
            Some(sink) => sink.report(report),
            None => Ok(()),
        }
    }
}

/// Collects reports in memory.
impl ReportSink for Vec<StrategyReport> {
    type Error = EngineError;

    fn report(&mut self, report: StrategyReport) -> Result<(), Self::Error> {
        self.push(report);
        Ok(())
    }
}
