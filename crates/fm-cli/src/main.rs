//! forkmul: multiply two integer matrices with one thread per row, then with
//! one thread per element, and report the result and timing of each.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fm_engine::{StrategyTag, WorkerLimit};
use fm_io::RunConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "forkmul")]
#[command(about = "Fork-join integer matrix multiplication, row and element decompositions")]
#[command(version)]
struct Cli {
    /// Input file with both matrices [default: ./input.txt]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, truncated at start [default: ./output.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Thread cap per strategy: "unbounded", "auto" or a positive count
    #[arg(short, long, env = "FORKMUL_WORKERS", default_value = "unbounded")]
    workers: WorkerLimit,

    /// Strategy to run (repeatable); defaults to row then element
    #[arg(short, long = "strategy", value_name = "row|element")]
    strategies: Vec<StrategyTag>,

    /// Do not print results to stdout
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> fm_io::Result<RunConfig> {
        let mut config = RunConfig::from_current_dir()?
            .with_workers(self.workers)
            .with_strategies(self.strategies)
            .with_console(!self.quiet);
        if let Some(input) = self.input {
            config = config.with_input(input);
        }
        if let Some(output) = self.output {
            config = config.with_output(output);
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = cli.into_config().and_then(|config| fm_io::run(&config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
