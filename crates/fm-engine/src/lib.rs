//! `fm-engine` - Parallel matrix multiplication engines for forkmul.
//!
//! This crate provides:
//! - A `MultiplyStrategy` trait with two fork-join implementations:
//!   `RowStrategy` (one worker per output row) and `ElementStrategy`
//!   (one worker per output cell)
//! - The `fork_join` primitive both engines launch their workers through
//! - A sequential `reference` product used as a baseline
//! - A `Pipeline` that times each strategy and hands the result to a
//!   `ReportSink`

pub mod element;
pub mod error;
pub mod fork_join;
mod kernel;
pub mod observer;
pub mod pipeline;
pub mod reference;
pub mod report;
pub mod row;
pub mod strategy;

// Re-export primary types at the crate root for convenience.
pub use element::ElementStrategy;
pub use error::{EngineError, Result};
pub use fork_join::WorkerLimit;
pub use observer::WorkObserver;
pub use pipeline::Pipeline;
pub use report::{ReportSink, StrategyReport};
pub use row::RowStrategy;
pub use strategy::{Multiplication, MultiplyStrategy, StrategyTag};
