use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use fm_engine::{ReportSink, StrategyReport, StrategyTag};
use tracing::debug;

use crate::error::{Result, RunError};

/// Writes a report in output-file format: one line per row with each value
/// right-aligned in five columns followed by a space, then a trailer line
/// `END<flag>\t[<seconds>]`.
pub fn write_report<W: Write>(out: &mut W, report: &StrategyReport) -> io::Result<()> {
    write!(out, "{}", report.matrix)?;
    writeln!(
        out,
        "END{}\t[{:.6}]",
        report.strategy.flag(),
        report.elapsed_seconds()
    )
}

/// Heading printed above a strategy's console output.
pub fn heading(tag: StrategyTag) -> &'static str {
    match tag {
        StrategyTag::Row => "row by col:-",
        StrategyTag::Element => "element by element:-",
    }
}

/// Appends every report to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates the output file, truncating any previous contents.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        File::create(&path).map_err(|source| RunError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "reset output file");
        Ok(FileSink { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, report: &StrategyReport) -> io::Result<()> {
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        let mut out = BufWriter::new(file);
        write_report(&mut out, report)?;
        out.flush()
    }
}

impl ReportSink for FileSink {
    type Error = RunError;

    fn report(&mut self, report: StrategyReport) -> Result<()> {
        self.append(&report).map_err(|source| RunError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), strategy = %report.strategy, "appended report");
        Ok(())
    }
}

/// Prints reports in human-readable form.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleSink { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        ConsoleSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    type Error = RunError;

    fn report(&mut self, report: StrategyReport) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", heading(report.strategy))?;
        writeln!(self.out, "execution time:: {:.6}", report.elapsed_seconds())?;
        writeln!(self.out, "multiplication of A and B:-")?;
        write!(self.out, "{}", report.matrix)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Forwards each report to two sinks, `first` then `second`.
#[derive(Debug)]
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Tee { first, second }
    }
}

impl<A, B> ReportSink for Tee<A, B>
where
    A: ReportSink<Error = RunError>,
    B: ReportSink<Error = RunError>,
{
    type Error = RunError;

    fn report(&mut self, report: StrategyReport) -> Result<()> {
        self.first.report(report.clone())?;
        self.second.report(report)
    }
}
