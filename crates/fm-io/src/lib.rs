//! `fm-io` - The edges of a forkmul run.
//!
//! Reads the two operand matrices from a whitespace-separated text file,
//! writes each strategy's result to an output file and the console, and
//! wires both ends to an `fm_engine::Pipeline` according to a `RunConfig`.

pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod runner;

pub use config::RunConfig;
pub use error::{InputError, Result, RunError};
pub use input::{parse_matrices, read_matrices, tokenize};
pub use output::{ConsoleSink, FileSink, Tee};
pub use runner::run;
