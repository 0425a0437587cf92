use std::path::{Path, PathBuf};

use fm_engine::{Pipeline, StrategyTag, WorkerLimit};

use crate::error::Result;

/// Default input file name, resolved against the working directory.
pub const DEFAULT_INPUT: &str = "input.txt";
/// Default output file name, resolved against the working directory.
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// File holding the two operand matrices.
    pub input: PathBuf,
    /// File the results are written to; truncated at the start of a run.
    pub output: PathBuf,
    /// Thread cap for every fork-join phase.
    pub workers: WorkerLimit,
    /// Strategies to run, in order.
    pub strategies: Vec<StrategyTag>,
    /// Also print each result to stdout.
    pub console: bool,
}

impl RunConfig {
    /// Defaults rooted at `dir`: `dir/input.txt`, `dir/output.txt`, unbounded
    /// workers, row then element strategy, console output on.
    pub fn in_dir(dir: &Path) -> Self {
        RunConfig {
            input: dir.join(DEFAULT_INPUT),
            output: dir.join(DEFAULT_OUTPUT),
            workers: WorkerLimit::Unbounded,
            strategies: StrategyTag::ALL.to_vec(),
            console: true,
        }
    }

    /// Defaults rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::in_dir(&cwd))
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_workers(mut self, workers: WorkerLimit) -> Self {
        self.workers = workers;
        self
    }

    /// Replaces the strategy list. An empty list keeps the current one.
    pub fn with_strategies(mut self, strategies: Vec<StrategyTag>) -> Self {
        if !strategies.is_empty() {
            self.strategies = strategies;
        }
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Pipeline running the configured strategies under the configured limit.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_tags(&self.strategies, self.workers)
    }
}
