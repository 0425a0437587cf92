use std::fmt::{self, Debug};
use std::str::FromStr;

use fm_matrix::Matrix;

use crate::element::ElementStrategy;
use crate::error::{EngineError, Result};
use crate::fork_join::WorkerLimit;
use crate::row::RowStrategy;

/// Identifies a work-decomposition strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyTag {
    /// One worker per output row.
    Row,
    /// One worker per output element.
    Element,
}

impl StrategyTag {
    /// All strategies in the order a standard run executes them.
    pub const ALL: [StrategyTag; 2] = [StrategyTag::Row, StrategyTag::Element];

    /// Numeric flag written after each result in the output file.
    ///
    /// - Element => 1
    /// - Row => 2
    pub fn flag(&self) -> u8 {
        match self {
            StrategyTag::Element => 1,
            StrategyTag::Row => 2,
        }
    }

    /// Builds the strategy this tag names.
    pub fn build(&self, limit: WorkerLimit) -> Box<dyn MultiplyStrategy> {
        match self {
            StrategyTag::Row => Box::new(RowStrategy::new(limit)),
            StrategyTag::Element => Box::new(ElementStrategy::new(limit)),
        }
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyTag::Row => write!(f, "row"),
            StrategyTag::Element => write!(f, "element"),
        }
    }
}

impl FromStr for StrategyTag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "row" | "rows" => Ok(StrategyTag::Row),
            "element" | "elements" | "cell" => Ok(StrategyTag::Element),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A finished product together with the number of workers that computed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiplication {
    pub matrix: Matrix,
    pub workers: usize,
}

/// Trait for parallel multiplication strategies.
///
/// Implementations compute `C = A @ B` by splitting C into disjoint work
/// items and running them through [`crate::fork_join::run`]. `multiply`
/// returns only after every worker has joined, and never returns a partially
/// computed matrix.
pub trait MultiplyStrategy: Send + Sync + Debug {
    /// Which decomposition this is.
    fn tag(&self) -> StrategyTag;

    /// Returns the name of this strategy (e.g., "row", "element").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// # Errors
    /// - [`EngineError::NotConformable`] if `a.columns() != b.rows()`, before
    ///   C is allocated or any worker is launched
    /// - [`EngineError::WorkerSpawn`] / [`EngineError::WorkerPanicked`] if the
    ///   fork-join phase fails
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Multiplication>;
}
