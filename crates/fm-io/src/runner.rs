use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::Result;
use crate::input::read_matrices;
use crate::output::{ConsoleSink, FileSink, Tee};

/// Executes one full run: reset the output file, read both operands, then
/// multiply with every configured strategy, writing each result as soon as
/// its workers have joined.
///
/// If the input cannot be read, the operands are not conformable, or their
/// product would not fit in memory, the output file is left empty.
pub fn run(config: &RunConfig) -> Result<()> {
    debug!(?config, "starting run");

    let file = FileSink::create(&config.output)?;
    let (a, b) = read_matrices(&config.input)?;
    info!(a = %a.dims(), b = %b.dims(), "loaded operands");

    let console = config.console.then(ConsoleSink::stdout);
    let mut sink = Tee::new(file, console);
    config.pipeline().run(&a, &b, &mut sink)?;

    info!(output = %config.output.display(), "run complete");
    Ok(())
}
