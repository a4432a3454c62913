//! Timing and reporting of reduction runs.
//!
//! Timing wraps a [`Reducer::reduce`] call from the outside; the reducers
//! themselves know nothing about it. Reports can be rendered as CSV lines and
//! appended to a file with [`ReportWriter`].

use crate::{Reducer, constants::LOG_TARGET, error::ReduceResult, reduction::Reduction};
use serde::Serialize;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Column names, written once at the top of a new report file.
pub const CSV_HEADER: &str = "timestamp_ms,strategy,workers,len,count,min,elapsed_ms";

/// File name used when the report path points at a directory
const DEFAULT_FILE_NAME: &str = "report.csv";

/// Outcome of one timed reduction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Wall-clock time the run finished, milliseconds since UNIX epoch
    pub timestamp_ms: u128,
    /// Strategy name
    pub strategy: &'static str,
    /// Workers forked by the strategy
    pub workers: usize,
    /// Input length
    pub len: usize,
    /// The reduction result
    pub result: Reduction,
    /// Time spent inside `reduce`
    pub elapsed: Duration,
}

impl RunReport {
    /// Elapsed time in fractional milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    /// Format the report as one CSV line matching [`CSV_HEADER`].
    pub fn to_csv_line(&self) -> String {
        let min = self.result.min.map(|m| m.to_string()).unwrap_or_default();

        format!(
            "{},{},{},{},{},{},{:.3}",
            self.timestamp_ms,
            self.strategy,
            self.workers,
            self.len,
            self.result.count,
            min,
            self.elapsed_ms()
        )
    }
}

/// Run `reducer` over `data` and record how long it took.
pub fn time_reduction(reducer: &dyn Reducer, data: &[i32]) -> ReduceResult<RunReport> {
    let start = Instant::now();
    let result = reducer.reduce(data)?;
    let elapsed = start.elapsed();

    Ok(RunReport {
        timestamp_ms: current_timestamp_ms(),
        strategy: reducer.name(),
        workers: reducer.workers(),
        len: data.len(),
        result,
        elapsed,
    })
}

/// Get current timestamp in milliseconds since UNIX epoch
fn current_timestamp_ms() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Appends CSV report lines to a file.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportWriter {
    /// Open `path` for appending, creating parent directories as needed.
    ///
    /// A path ending in a separator, or an extension-less path that does not
    /// exist yet, is treated as a directory and gets `report.csv` appended. The
    /// header is written when the file is empty.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file_path = if path.to_string_lossy().ends_with('/')
            || path.to_string_lossy().ends_with('\\')
            || (path.extension().is_none() && !path.exists())
        {
            path.join(DEFAULT_FILE_NAME)
        } else {
            path
        };

        if let Some(parent) = file_path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!(
                target: LOG_TARGET,
                ?parent,
                error = %e,
                "Failed to create report output directory"
            );
        }

        let file = match OpenOptions::new().create(true).append(true).open(&file_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    ?file_path,
                    error = %e,
                    "Failed to open report file"
                );
                return Err(e);
            }
        };
        let is_new = file.metadata()?.len() == 0;

        let mut writer = BufWriter::new(file);
        if is_new {
            writeln!(writer, "{CSV_HEADER}")?;
        }

        tracing::info!(target: LOG_TARGET, ?file_path, "Report file opened for appending");
        Ok(Self { path: file_path, writer })
    }

    /// Resolved path of the report file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one report line.
    pub fn append(&mut self, report: &RunReport) -> io::Result<()> {
        writeln!(self.writer, "{}", report.to_csv_line())
    }

    /// Flush buffer to the OS. Use `sync_all()` for disk persistence.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and sync to disk.
    pub fn sync_all(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()
    }
}
